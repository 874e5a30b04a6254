use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} environment variable is required")]
    MissingVar { var: &'static str },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        format!("configuration error: {self}. Ensure GATEWAY_URL and COGNITO_SCOPE are set.")
    }
}
