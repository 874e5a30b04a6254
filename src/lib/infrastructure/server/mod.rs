//! HTTP surface of the agent runtime contract: `POST /invocations` streams
//! events as server-sent events and `GET /ping` reports health.

mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use dto::{InvocationRequest, PingResponse};
pub use error::ServerError;
pub use routes::invocations::{SESSION_ID_HEADER, USER_ID_HEADER};

use crate::application::handler::SlackGatewayAgent;
use axum::Router;
use std::net::SocketAddr;

/// Router with every route and the optional CORS layer, without binding.
pub fn app(agent: SlackGatewayAgent, cors_origins: &[String]) -> Router {
    router::app(agent, cors_origins)
}

pub async fn serve(
    agent: SlackGatewayAgent,
    addr: SocketAddr,
    cors_origins: &[String],
) -> Result<(), ServerError> {
    router::serve(agent, addr, cors_origins).await
}
