//! Message adapters - convert between domain types and the chat completions wire format

use crate::domain::tool::ToolDescriptor;
use crate::domain::types::{ChatMessage, MessageRole};
use serde_json::{Map, Value, json};

pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format, carrying tool calls on
    /// assistant turns and `tool_call_id` on tool results.
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages.iter().map(Self::message).collect()
    }

    /// Convert gateway tools to `{"type":"function","function":{...}}` entries.
    pub fn to_openai_tools(tools: &[ToolDescriptor]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                let parameters = if tool.input_schema.is_object() {
                    tool.input_schema.clone()
                } else {
                    json!({"type": "object", "properties": {}})
                };
                let mut function = Map::new();
                function.insert("name".into(), Value::String(tool.name.clone()));
                if let Some(description) = &tool.description {
                    function.insert("description".into(), Value::String(description.clone()));
                }
                function.insert("parameters".into(), parameters);
                json!({"type": "function", "function": function})
            })
            .collect()
    }

    fn message(message: &ChatMessage) -> Value {
        match message.role {
            MessageRole::Assistant if !message.tool_calls.is_empty() => {
                let calls: Vec<Value> = message
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
                let content = if message.content.is_empty() {
                    Value::Null
                } else {
                    Value::String(message.content.clone())
                };
                json!({"role": "assistant", "content": content, "tool_calls": calls})
            }
            MessageRole::Tool => json!({
                "role": "tool",
                "tool_call_id": message.tool_call_id.clone().unwrap_or_default(),
                "content": message.content,
            }),
            role => json!({"role": role.as_str(), "content": message.content}),
        }
    }
}
