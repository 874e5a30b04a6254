//! Access-token acquisition for the gateway.
//!
//! The token itself is issued by an external [`CredentialProvider`]; this
//! module only assembles the request, awaits the result and records
//! redacted diagnostics.

mod error;

pub use error::CredentialError;

use crate::config::AgentConfig;
use crate::domain::{AccessToken, InvocationContext};
use async_trait::async_trait;
use std::fmt;
use tracing::{error, info};

/// Credential provider registered for the gateway's inbound authorizer.
pub const GATEWAY_PROVIDER_NAME: &str = "agentcore-identity-for-gateway";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    /// Machine-to-machine (`client_credentials`).
    M2M,
    /// Three-legged user delegation.
    UserFederation,
}

impl fmt::Display for AuthFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFlow::M2M => f.write_str("M2M"),
            AuthFlow::UserFederation => f.write_str("USER_FEDERATION"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub provider_name: String,
    pub scopes: Vec<String>,
    pub auth_flow: AuthFlow,
    /// When false the provider may reuse its own session state.
    pub force_authentication: bool,
    pub workload_name: String,
    pub user_id: String,
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn fetch_token(&self, request: &TokenRequest) -> Result<AccessToken, CredentialError>;
}

/// Builds the M2M token request for this invocation. A user id supplied by
/// the hosting runtime takes precedence over the configured one.
pub fn token_request(config: &AgentConfig, context: &InvocationContext) -> TokenRequest {
    TokenRequest {
        provider_name: GATEWAY_PROVIDER_NAME.to_string(),
        scopes: vec![config.cognito_scope.clone()],
        auth_flow: AuthFlow::M2M,
        force_authentication: false,
        workload_name: config.workload_name.clone(),
        user_id: context
            .runtime_user_id
            .clone()
            .unwrap_or_else(|| config.user_id.clone()),
    }
}

/// Obtains a fresh access token. Provider errors are returned unchanged.
pub async fn acquire_token(
    provider: &dyn CredentialProvider,
    config: &AgentConfig,
    context: &InvocationContext,
) -> Result<AccessToken, CredentialError> {
    let request = token_request(config, context);
    info!(
        provider = request.provider_name.as_str(),
        flow = %request.auth_flow,
        user_id = request.user_id.as_str(),
        "Requesting access token"
    );

    match provider.fetch_token(&request).await {
        Ok(token) => {
            info!(
                workload_name = request.workload_name.as_str(),
                token_prefix = %format_args!("{}...", token.prefix()),
                token_len = token.len(),
                "Access token acquired"
            );
            Ok(token)
        }
        Err(err) => {
            error!(%err, provider = request.provider_name.as_str(), "Access token request failed");
            Err(err)
        }
    }
}
