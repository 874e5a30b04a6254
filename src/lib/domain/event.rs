//! Streamed response events.
//!
//! Error and data records have a fixed shape; everything else the runtime
//! produces is an opaque JSON object that the handler forwards untouched.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentEvent {
    /// Terminal failure record, `{"error": "..."}`.
    Error { error: String },
    /// Incremental output record, `{"data": ...}`.
    Data { data: Value },
    /// Any other runtime record (tool-use notices, final message).
    Other(Map<String, Value>),
}

impl AgentEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn data(data: impl Into<Value>) -> Self {
        Self::Data { data: data.into() }
    }

    /// Wraps a single-key record such as `{"current_tool_use": {...}}`.
    pub fn record(key: &str, value: Value) -> Self {
        let mut map = Map::new();
        map.insert(key.to_string(), value);
        Self::Other(map)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Error { error } => serde_json::json!({ "error": error }),
            Self::Data { data } => serde_json::json!({ "data": data }),
            Self::Other(map) => Value::Object(map.clone()),
        }
    }
}
