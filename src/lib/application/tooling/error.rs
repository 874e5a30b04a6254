use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Read timeout on endpoint URL: '{url}'")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("gateway transport error for '{url}': {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("gateway returned invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("gateway returned JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("gateway response to '{method}' carried no result")]
    MissingResult { method: String },
    #[error("no tools available from the gateway")]
    NoToolsAvailable,
    #[error("gateway session already closed")]
    Closed,
    #[error("failed to build gateway HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{0}")]
    Other(String),
}
