use super::aggregator::ToolCallAggregator;
use super::runtime::{AgentRuntime, AgentSpec, EventStream, RuntimeFactory};
use super::RuntimeError;
use crate::application::tooling::GatewaySession;
use crate::domain::AgentEvent;
use crate::domain::types::{ChatMessage, MessageRole};
use crate::infrastructure::model::{ModelDelta, ModelProvider, ModelRequest};
use async_stream::try_stream;
use futures::StreamExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tool-use loop over a streaming chat model. Each turn's text is relayed as
/// it arrives; tool calls requested at the end of a turn run against the
/// gateway session and their results feed the next turn.
pub struct StreamingAgent {
    model: Arc<dyn ModelProvider>,
    spec: AgentSpec,
    session: Arc<dyn GatewaySession>,
    max_cycles: usize,
}

impl StreamingAgent {
    pub fn new(
        model: Arc<dyn ModelProvider>,
        spec: AgentSpec,
        session: Arc<dyn GatewaySession>,
        max_cycles: usize,
    ) -> Self {
        Self {
            model,
            spec,
            session,
            max_cycles,
        }
    }
}

impl AgentRuntime for StreamingAgent {
    fn stream(self: Box<Self>, prompt: String) -> EventStream {
        let StreamingAgent {
            model,
            spec,
            session,
            max_cycles,
        } = *self;

        Box::pin(try_stream! {
            let tools: Vec<_> = spec.tools.iter().cloned().collect();
            let mut messages = vec![
                ChatMessage::new(MessageRole::System, spec.system_prompt.clone()),
                ChatMessage::new(MessageRole::User, prompt),
            ];

            info!(
                model = model.id(),
                model_id = spec.model_id.as_str(),
                tools = tools.len(),
                max_cycles,
                "Agent run started"
            );

            for cycle in 1..=max_cycles {
                debug!(cycle, messages = messages.len(), "Starting model turn");

                let request = ModelRequest::new(spec.model_id.clone(), messages.clone())
                    .with_tools(tools.clone());
                let mut turn = model.stream_chat(request).await?;

                let mut text = String::new();
                let mut pending = ToolCallAggregator::default();

                while let Some(delta) = turn.next().await {
                    match delta? {
                        ModelDelta::Text(chunk) => {
                            text.push_str(&chunk);
                            yield AgentEvent::data(chunk);
                        }
                        ModelDelta::ToolCall(fragment) => {
                            let tool_use = json!({
                                "toolUse": {
                                    "index": fragment.index,
                                    "toolUseId": fragment.id,
                                    "name": fragment.name,
                                    "input": fragment.arguments,
                                }
                            });
                            debug!(delta = %tool_use, "Tool use delta");
                            pending.apply(&fragment);
                            yield AgentEvent::record("delta", tool_use);
                        }
                        ModelDelta::Finish(reason) => {
                            debug!(cycle, reason = reason.as_str(), "Model turn finished");
                        }
                    }
                }

                // Calls dropped by the aggregator do not keep the run going.
                let calls = pending.finish();
                if calls.is_empty() {
                    info!(cycle, chars = text.chars().count(), "Agent run completed");
                    yield AgentEvent::record(
                        "message",
                        json!({"role": "assistant", "content": text}),
                    );
                    return;
                }

                messages.push(ChatMessage::assistant_with_calls(text, calls.clone()));

                for call in calls {
                    yield AgentEvent::record(
                        "current_tool_use",
                        json!({
                            "toolUseId": call.id,
                            "name": call.name,
                            "input": call.arguments,
                        }),
                    );

                    if spec.tools.get(&call.name).is_none() {
                        warn!(tool = call.name.as_str(), "Model requested a tool the gateway did not list");
                    }
                    info!(tool = call.name.as_str(), tool_use_id = call.id.as_str(), "Invoking gateway tool");
                    let (status, content) =
                        match session.call_tool(&call.name, call.arguments.clone()).await {
                            Ok(result) => tool_outcome(&result),
                            Err(err) => {
                                warn!(tool = call.name.as_str(), error = %err, "Gateway tool call failed");
                                ("error", json!([{ "text": err.to_string() }]))
                            }
                        };

                    let rendered = content_text(&content);
                    yield AgentEvent::record(
                        "tool_result",
                        json!({
                            "toolUseId": call.id,
                            "status": status,
                            "content": content,
                        }),
                    );
                    messages.push(ChatMessage::tool_result(call.id, rendered));
                }
            }

            warn!(max_cycles, "Agent exhausted its model turns");
            Err(RuntimeError::CycleLimit { cycles: max_cycles })?;
        })
    }
}

/// Split a `tools/call` result into a status and its content blocks.
fn tool_outcome(result: &Value) -> (&'static str, Value) {
    let failed = result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let status = if failed { "error" } else { "success" };
    let content = match result.get("content") {
        Some(content) => content.clone(),
        None => json!([{ "json": result }]),
    };
    (status, content)
}

/// Text fed back to the model for a tool result.
fn content_text(content: &Value) -> String {
    match content {
        Value::Array(blocks) => blocks
            .iter()
            .map(|block| match block.get("text").and_then(Value::as_str) {
                Some(text) => text.to_string(),
                None => block.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Builds a [`StreamingAgent`] per invocation around a shared model client.
pub struct StreamingAgentFactory {
    model: Arc<dyn ModelProvider>,
    max_cycles: usize,
}

impl StreamingAgentFactory {
    pub fn new(model: Arc<dyn ModelProvider>, max_cycles: usize) -> Self {
        Self { model, max_cycles }
    }
}

impl RuntimeFactory for StreamingAgentFactory {
    fn build(&self, spec: AgentSpec, session: Arc<dyn GatewaySession>) -> Box<dyn AgentRuntime> {
        Box::new(StreamingAgent::new(
            Arc::clone(&self.model),
            spec,
            session,
            self.max_cycles,
        ))
    }
}
