//! Invocation entrypoint: turns one prompt into a stream of events.
//!
//! Steps run strictly in order and every failure ends the stream with a
//! single `{"error": ...}` event:
//!
//! 1. load configuration
//! 2. validate the payload
//! 3. acquire an access token
//! 4. open a gateway session and list its tools
//! 5. build the agent runtime and relay its events
//!
//! The gateway session is closed on every exit path once it is open.

mod classify;

pub use classify::{FailureKind, classify_failure};

use crate::application::agent::{AgentSpec, RuntimeFactory};
use crate::application::credentials::{CredentialProvider, acquire_token};
use crate::application::tooling::{GatewayConnector, list_all_tools};
use crate::config::{AgentConfig, EnvSource};
use crate::domain::{AgentEvent, InvocationContext, InvocationPayload};
use async_stream::stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub type InvocationStream = BoxStream<'static, AgentEvent>;

#[derive(Clone)]
pub struct SlackGatewayAgent {
    env: Arc<dyn EnvSource>,
    credentials: Arc<dyn CredentialProvider>,
    gateway: Arc<dyn GatewayConnector>,
    runtime: Arc<dyn RuntimeFactory>,
}

impl SlackGatewayAgent {
    pub fn new(
        env: Arc<dyn EnvSource>,
        credentials: Arc<dyn CredentialProvider>,
        gateway: Arc<dyn GatewayConnector>,
        runtime: Arc<dyn RuntimeFactory>,
    ) -> Self {
        Self {
            env,
            credentials,
            gateway,
            runtime,
        }
    }

    /// Runs one invocation. Nothing happens until the stream is polled;
    /// dropping it abandons any pending call and releases the session.
    pub fn invoke(&self, payload: Value, context: InvocationContext) -> InvocationStream {
        let env = Arc::clone(&self.env);
        let credentials = Arc::clone(&self.credentials);
        let gateway = Arc::clone(&self.gateway);
        let runtime = Arc::clone(&self.runtime);
        let invocation = context
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Box::pin(stream! {
            info!(invocation = invocation.as_str(), "Step 0: loading configuration");
            let config = match AgentConfig::from_source(env.as_ref()) {
                Ok(config) => config,
                Err(err) => {
                    error!(invocation = invocation.as_str(), error = %err, "Configuration error");
                    yield AgentEvent::error(err.user_message());
                    return;
                }
            };

            let prompt = match InvocationPayload::from_value(&payload) {
                Ok(payload) => payload.prompt,
                Err(err) => {
                    warn!(invocation = invocation.as_str(), error = %err, "Rejecting payload");
                    yield AgentEvent::error(err.to_string());
                    return;
                }
            };

            info!(invocation = invocation.as_str(), "Step 1: acquiring access token");
            let token = match acquire_token(credentials.as_ref(), &config, &context).await {
                Ok(token) => token,
                Err(err) => {
                    yield failure_event(&invocation, &err.to_string());
                    return;
                }
            };

            info!(
                invocation = invocation.as_str(),
                gateway_url = config.gateway_url.as_str(),
                "Step 2: opening gateway session"
            );
            let session = match gateway.connect(&config.gateway_url, &token).await {
                Ok(session) => session,
                Err(err) => {
                    yield failure_event(&invocation, &err.to_string());
                    return;
                }
            };

            info!(invocation = invocation.as_str(), "Step 3: listing gateway tools");
            let tools = match list_all_tools(session.as_ref()).await {
                Ok(tools) => tools,
                Err(err) => {
                    session.close().await;
                    yield failure_event(&invocation, &err.to_string());
                    return;
                }
            };

            info!(
                invocation = invocation.as_str(),
                tools = tools.len(),
                "Step 4: building agent runtime"
            );
            let agent = runtime.build(AgentSpec::new(tools), Arc::clone(&session));

            info!(
                invocation = invocation.as_str(),
                prompt = prompt.as_str(),
                "Step 5: streaming agent response"
            );
            let mut events = agent.stream(prompt);
            let mut failure = None;
            while let Some(item) = events.next().await {
                match item {
                    Ok(event) => {
                        log_event(&event);
                        let terminal = event.is_error();
                        yield event;
                        if terminal {
                            warn!(invocation = invocation.as_str(), "Runtime reported an error; ending stream");
                            break;
                        }
                    }
                    Err(err) => {
                        failure = Some(err);
                        break;
                    }
                }
            }
            drop(events);
            session.close().await;

            if let Some(err) = failure {
                yield failure_event(&invocation, &err.to_string());
            } else {
                info!(invocation = invocation.as_str(), "Invocation completed");
            }
        })
    }
}

fn failure_event(invocation: &str, message: &str) -> AgentEvent {
    let kind = FailureKind::classify(message);
    error!(invocation, kind = %kind, error = message, "Invocation failed");
    AgentEvent::error(classify_failure(message))
}

fn log_event(event: &AgentEvent) {
    if let AgentEvent::Other(record) = event {
        if let Some(tool) = record.get("current_tool_use") {
            info!(tool = %tool, "Tool use");
        } else if let Some(delta) = record.get("delta").and_then(|d| d.get("toolUse")) {
            debug!(tool_use = %delta, "Tool use delta");
        }
    }
}
