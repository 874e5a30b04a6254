//! Model infrastructure module
//!
//! # Structure
//! - `types` - request, delta and error types
//! - `traits` - the `ModelProvider` seam used by the agent loop
//! - `adapter` - chat completions wire format
//! - `clients` - HTTP client implementations

pub mod adapter;
pub mod clients;
pub mod traits;
pub mod types;

pub use clients::OpenAIClient;
pub use traits::ModelProvider;
pub use types::{ModelDelta, ModelError, ModelRequest, ModelStream, ToolCallFragment};
