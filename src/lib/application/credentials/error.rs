use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential provider '{provider}' is not configured: {reason}")]
    NotConfigured { provider: String, reason: String },
    #[error("credential provider '{provider}' does not support the {flow} flow")]
    UnsupportedFlow { provider: String, flow: String },
    #[error("credential provider '{provider}' transport error: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Read timeout on endpoint URL: '{url}'")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("credential provider '{provider}' rejected the request ({status}): {body}")]
    Rejected {
        provider: String,
        status: u16,
        body: String,
    },
    #[error("credential provider '{provider}' returned an invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
    #[error("failed to build credential HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{0}")]
    Other(String),
}
