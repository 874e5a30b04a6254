use super::super::dto::InvocationRequest;
use super::super::state::ServerState;
use crate::domain::InvocationContext;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{info, warn};

pub const USER_ID_HEADER: &str = "x-amzn-bedrock-agentcore-runtime-user-id";
pub const SESSION_ID_HEADER: &str = "x-amzn-bedrock-agentcore-runtime-session-id";

#[utoipa::path(
    post,
    path = "/invocations",
    tag = "agent",
    request_body = InvocationRequest,
    responses(
        (status = 200, description = "Server-sent events, one JSON event per frame; failures arrive as a final {\"error\": ...} event", content_type = "text/event-stream", body = String)
    )
)]
pub async fn invocations_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let context = InvocationContext {
        runtime_user_id: header_value(&headers, USER_ID_HEADER),
        session_id: header_value(&headers, SESSION_ID_HEADER),
    };
    info!(
        session = context.session_id.as_deref(),
        bytes = body.len(),
        "Received /invocations request"
    );

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "Invocation body is not JSON");
            Value::Null
        }
    };

    let events = state
        .agent()
        .invoke(payload, context)
        .map(|event| Ok(Event::default().data(event.to_json().to_string())));

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
