//! Model endpoint settings for the streaming agent runtime.
//!
//! The runtime speaks the OpenAI-compatible chat-completions protocol. By
//! default it targets the Bedrock runtime's compatible endpoint in the
//! ambient region, authenticated with a Bedrock API key.

use super::defaults::{DEFAULT_MAX_CYCLES, DEFAULT_MODEL_REGION};
use super::error::ConfigError;
use super::loader::{
    AWS_BEARER_TOKEN_BEDROCK, EnvSource, MODEL_API_KEY, MODEL_ENDPOINT, MODEL_MAX_CYCLES,
    resolve_region,
};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_cycles: usize,
}

impl ModelSettings {
    pub fn from_source(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        let endpoint = source.non_blank(MODEL_ENDPOINT).unwrap_or_else(|| {
            let region =
                resolve_region(source).unwrap_or_else(|| DEFAULT_MODEL_REGION.to_string());
            format!("https://bedrock-runtime.{region}.amazonaws.com/openai/v1")
        });
        let api_key = source
            .non_blank(MODEL_API_KEY)
            .or_else(|| source.non_blank(AWS_BEARER_TOKEN_BEDROCK));
        let max_cycles = match source.non_blank(MODEL_MAX_CYCLES) {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: MODEL_MAX_CYCLES,
                    value: raw,
                })?,
            None => DEFAULT_MAX_CYCLES,
        };
        Ok(Self {
            endpoint,
            api_key,
            max_cycles,
        })
    }
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_cycles", &self.max_cycles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_to_regional_bedrock_endpoint() {
        let mut source = HashMap::new();
        source.insert("AWS_REGION".to_string(), "us-west-2".to_string());
        source.insert("AWS_BEARER_TOKEN_BEDROCK".to_string(), "key".to_string());
        let settings = ModelSettings::from_source(&source).expect("settings load");
        assert_eq!(
            settings.endpoint,
            "https://bedrock-runtime.us-west-2.amazonaws.com/openai/v1"
        );
        assert_eq!(settings.api_key.as_deref(), Some("key"));
        assert_eq!(settings.max_cycles, DEFAULT_MAX_CYCLES);
    }

    #[test]
    fn rejects_zero_cycles() {
        let mut source = HashMap::new();
        source.insert("MODEL_MAX_CYCLES".to_string(), "0".to_string());
        assert!(matches!(
            ModelSettings::from_source(&source),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
