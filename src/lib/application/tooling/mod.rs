//! Tool gateway access: MCP over streamable HTTP, tool discovery and
//! tool invocation on behalf of the agent runtime.

mod catalog;
mod error;
mod http;
mod interface;
mod rpc;

pub use catalog::list_all_tools;
pub use error::GatewayError;
pub use http::{HttpGatewaySession, StreamableHttpConnector};
pub use interface::{GatewayConnector, GatewaySession};
