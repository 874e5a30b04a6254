use super::dto::{InvocationRequest, PingResponse};
use super::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(routes::invocations::invocations_handler, routes::ping::ping_handler),
    components(schemas(InvocationRequest, PingResponse)),
    tags(
        (name = "agent", description = "Streaming agent invocations"),
        (name = "health", description = "Runtime health checks")
    )
)]
pub(super) struct ApiDoc;
