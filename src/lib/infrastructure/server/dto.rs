use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Documented shape of the `/invocations` body. The handler reads the body
/// leniently so that malformed payloads still get an in-stream error event.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvocationRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    pub status: String,
    pub time_of_last_update: i64,
}
