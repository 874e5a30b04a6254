//! Reassembles streamed tool-call fragments into complete calls.

use crate::domain::types::ToolCall;
use crate::infrastructure::model::ToolCallFragment;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Default)]
struct PendingCall {
    id: Option<String>,
    name: String,
    arguments: String,
}

#[derive(Debug, Default)]
pub(crate) struct ToolCallAggregator {
    calls: BTreeMap<u32, PendingCall>,
}

impl ToolCallAggregator {
    pub(crate) fn apply(&mut self, fragment: &ToolCallFragment) {
        let call = self.calls.entry(fragment.index).or_default();
        if let Some(id) = fragment.id.as_deref().filter(|id| !id.is_empty()) {
            call.id = Some(id.to_string());
        }
        if let Some(name) = &fragment.name {
            call.name.push_str(name);
        }
        call.arguments.push_str(&fragment.arguments);
    }

    /// Completed calls in index order. Nameless calls are dropped; calls the
    /// provider left without an id get a generated one.
    pub(crate) fn finish(self) -> Vec<ToolCall> {
        self.calls
            .into_values()
            .filter_map(|call| {
                if call.name.is_empty() {
                    warn!("Dropping streamed tool call without a name");
                    return None;
                }
                let arguments = parse_arguments(&call.name, &call.arguments);
                Some(ToolCall {
                    id: call
                        .id
                        .unwrap_or_else(|| format!("tooluse_{}", Uuid::new_v4().simple())),
                    name: call.name,
                    arguments,
                })
            })
            .collect()
    }
}

fn parse_arguments(tool: &str, raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            warn!(tool, arguments = %other, "Tool arguments are not an object; sending empty input");
            Value::Object(Map::new())
        }
        Err(err) => {
            warn!(tool, error = %err, "Tool arguments are not valid JSON; sending empty input");
            Value::Object(Map::new())
        }
    }
}
