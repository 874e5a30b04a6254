use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("invalid payload: 'prompt' field required")]
    MissingPrompt,
    #[error("invalid payload: 'prompt' must be a string")]
    PromptNotString,
}

/// Inbound invocation body. Only `prompt` is mandated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationPayload {
    pub prompt: String,
}

impl InvocationPayload {
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let prompt = value
            .as_object()
            .and_then(|object| object.get("prompt"))
            .ok_or(PayloadError::MissingPrompt)?;
        let prompt = prompt.as_str().ok_or(PayloadError::PromptNotString)?;
        Ok(Self {
            prompt: prompt.to_string(),
        })
    }
}

/// Per-request metadata supplied by the hosting runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub runtime_user_id: Option<String>,
    pub session_id: Option<String>,
}
