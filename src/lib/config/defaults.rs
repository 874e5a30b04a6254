use std::time::Duration;

pub const DEFAULT_WORKLOAD_NAME: &str = "slack-gateway-agent";
pub const DEFAULT_USER_ID: &str = "m2m-user-001";
pub const DEFAULT_MODEL_REGION: &str = "us-east-1";
pub const DEFAULT_MAX_CYCLES: usize = 16;
pub const DEFAULT_ENV_PATH: &str = "config/.env";

/// Bound on connecting and on plain request/response exchanges.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Bound on a single read while a response or event stream is open.
pub const STREAM_READ_TIMEOUT: Duration = Duration::from_secs(300);
