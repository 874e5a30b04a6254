//! Runtime seam between the request handler and the agent loop.

use super::RuntimeError;
use crate::application::tooling::GatewaySession;
use crate::domain::{AgentEvent, ToolSet};
use futures::stream::BoxStream;
use std::sync::Arc;

/// Model used for every invocation.
pub const MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

/// Instructional text steering tool selection between the Slack and web
/// search tool families.
pub const SYSTEM_PROMPT: &str = include_str!("system_prompt.md");

pub type EventStream = BoxStream<'static, Result<AgentEvent, RuntimeError>>;

#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub tools: ToolSet,
    pub model_id: String,
    pub system_prompt: String,
}

impl AgentSpec {
    /// Spec with the fixed model and system prompt.
    pub fn new(tools: ToolSet) -> Self {
        Self {
            tools,
            model_id: MODEL_ID.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// A configured agent ready to answer one prompt.
pub trait AgentRuntime: Send {
    fn stream(self: Box<Self>, prompt: String) -> EventStream;
}

pub trait RuntimeFactory: Send + Sync {
    fn build(&self, spec: AgentSpec, session: Arc<dyn GatewaySession>) -> Box<dyn AgentRuntime>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_uses_fixed_model_and_prompt() {
        let spec = AgentSpec::new(ToolSet::default());
        assert_eq!(spec.model_id, MODEL_ID);
        assert!(spec.system_prompt.contains("chatPostMessage"));
        assert!(spec.system_prompt.contains("extract"));
    }
}
