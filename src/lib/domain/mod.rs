//! Request-scoped value types shared by the handler, gateway and runtime.

pub mod event;
pub mod payload;
pub mod token;
pub mod tool;
pub mod types;

pub use event::AgentEvent;
pub use payload::{InvocationContext, InvocationPayload, PayloadError};
pub use token::AccessToken;
pub use tool::{ToolDescriptor, ToolPage, ToolSet};
