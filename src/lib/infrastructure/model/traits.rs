//! Model traits

use super::types::{ModelError, ModelRequest, ModelStream};
use async_trait::async_trait;

/// Streaming chat model used by the agent loop.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> &str;

    /// Start a chat turn. The returned stream yields text and tool-call
    /// deltas until the model finishes the turn.
    async fn stream_chat(&self, request: ModelRequest) -> Result<ModelStream, ModelError>;
}
