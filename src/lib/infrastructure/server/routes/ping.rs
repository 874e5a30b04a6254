use super::super::dto::PingResponse;
use super::super::state::ServerState;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;

const HEALTHY: &str = "Healthy";

#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses((status = 200, description = "Runtime is ready for invocations", body = PingResponse))
)]
pub async fn ping_handler(State(state): State<Arc<ServerState>>) -> Json<PingResponse> {
    Json(PingResponse {
        status: HEALTHY.to_string(),
        time_of_last_update: state.started_at(),
    })
}
