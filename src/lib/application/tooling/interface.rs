use super::error::GatewayError;
use crate::domain::{AccessToken, ToolPage};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// An authenticated connection to the tool gateway.
///
/// A session lives from tool discovery until the agent run that uses it has
/// finished; callers release it with [`GatewaySession::close`].
#[async_trait]
pub trait GatewaySession: Send + Sync {
    /// Fetches one page of the tool listing starting at `cursor`.
    async fn list_tools_page(&self, cursor: Option<&str>) -> Result<ToolPage, GatewayError>;

    /// Invokes a tool and returns the raw `tools/call` result.
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, GatewayError>;

    /// Releases the session. Calling it more than once is a no-op.
    async fn close(&self);
}

#[async_trait]
pub trait GatewayConnector: Send + Sync {
    async fn connect(
        &self,
        url: &str,
        token: &AccessToken,
    ) -> Result<Arc<dyn GatewaySession>, GatewayError>;
}
