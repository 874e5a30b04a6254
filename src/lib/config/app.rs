use super::defaults::{DEFAULT_USER_ID, DEFAULT_WORKLOAD_NAME};
use super::error::ConfigError;
use super::loader::{
    COGNITO_SCOPE, EnvSource, GATEWAY_URL, USER_ID, WORKLOAD_NAME, resolve_region,
};
use tracing::info;

/// Per-invocation agent configuration sourced from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub gateway_url: String,
    pub cognito_scope: String,
    pub workload_name: String,
    pub user_id: String,
    pub region: Option<String>,
}

impl AgentConfig {
    /// Reads and validates the configuration. Fails before any network
    /// activity when the gateway URL or the OAuth scope is absent.
    pub fn from_source(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        let gateway_url = source
            .non_blank(GATEWAY_URL)
            .ok_or(ConfigError::MissingVar { var: GATEWAY_URL })?;
        let cognito_scope = source
            .non_blank(COGNITO_SCOPE)
            .ok_or(ConfigError::MissingVar { var: COGNITO_SCOPE })?;
        let workload_name = source
            .non_blank(WORKLOAD_NAME)
            .unwrap_or_else(|| DEFAULT_WORKLOAD_NAME.to_string());
        let user_id = source
            .non_blank(USER_ID)
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
        let region = resolve_region(source);

        info!(
            gateway_url = gateway_url.as_str(),
            cognito_scope = cognito_scope.as_str(),
            workload_name = workload_name.as_str(),
            user_id = user_id.as_str(),
            region = region.as_deref().unwrap_or("<unset>"),
            "Loaded agent configuration"
        );

        Ok(Self {
            gateway_url,
            cognito_scope,
            workload_name,
            user_id,
            region,
        })
    }
}
