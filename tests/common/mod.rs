// Shared stub collaborators for handler and server tests.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use slack_gateway_agent::agent::{AgentRuntime, AgentSpec, EventStream, RuntimeError, RuntimeFactory};
use slack_gateway_agent::config::EnvSource;
use slack_gateway_agent::credentials::{CredentialError, CredentialProvider, TokenRequest};
use slack_gateway_agent::domain::{AccessToken, AgentEvent, ToolDescriptor, ToolPage};
use slack_gateway_agent::tooling::{GatewayConnector, GatewayError, GatewaySession};
use slack_gateway_agent::SlackGatewayAgent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Environment
// ============================================================================

pub fn env(pairs: &[(&str, &str)]) -> Arc<dyn EnvSource> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    Arc::new(map)
}

pub fn valid_env() -> Arc<dyn EnvSource> {
    env(&[
        ("GATEWAY_URL", "https://gateway.example/mcp"),
        ("COGNITO_SCOPE", "gateway/invoke"),
    ])
}

// ============================================================================
// Credentials
// ============================================================================

#[derive(Default)]
pub struct RecordingCredentials {
    pub requests: Mutex<Vec<TokenRequest>>,
    pub failure: Option<String>,
}

impl RecordingCredentials {
    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CredentialProvider for RecordingCredentials {
    async fn fetch_token(&self, request: &TokenRequest) -> Result<AccessToken, CredentialError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        match &self.failure {
            Some(message) => Err(CredentialError::Other(message.clone())),
            None => Ok(AccessToken::new(format!(
                "eyJraWQiOiJ0ZXN0LXRva2VuLSN7-{}",
                requests.len()
            ))),
        }
    }
}

// ============================================================================
// Gateway
// ============================================================================

pub fn page(names: &[&str], cursor: Option<&str>) -> ToolPage {
    ToolPage {
        tools: names.iter().map(|name| ToolDescriptor::new(*name)).collect(),
        next_cursor: cursor.map(str::to_string),
    }
}

pub struct StubSession {
    pages: Vec<ToolPage>,
    pub cursors: Mutex<Vec<Option<String>>>,
    pub closes: AtomicUsize,
}

impl StubSession {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewaySession for StubSession {
    async fn list_tools_page(&self, cursor: Option<&str>) -> Result<ToolPage, GatewayError> {
        let mut cursors = self.cursors.lock().unwrap();
        cursors.push(cursor.map(str::to_string));
        self.pages
            .get(cursors.len() - 1)
            .cloned()
            .ok_or_else(|| GatewayError::Other("unexpected page request".into()))
    }

    async fn call_tool(&self, name: &str, _arguments: Value) -> Result<Value, GatewayError> {
        Ok(serde_json::json!({ "content": [{ "type": "text", "text": name }] }))
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hands out a fresh [`StubSession`] over the same pages on every connect.
pub struct StubConnector {
    pages: Vec<ToolPage>,
    pub failure: Option<String>,
    pub sessions: Mutex<Vec<Arc<StubSession>>>,
    pub urls: Mutex<Vec<String>>,
}

impl StubConnector {
    pub fn new(pages: Vec<ToolPage>) -> Self {
        Self {
            pages,
            failure: None,
            sessions: Mutex::new(Vec::new()),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn connects(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn session(&self, index: usize) -> Arc<StubSession> {
        Arc::clone(&self.sessions.lock().unwrap()[index])
    }
}

#[async_trait]
impl GatewayConnector for StubConnector {
    async fn connect(
        &self,
        url: &str,
        _token: &AccessToken,
    ) -> Result<Arc<dyn GatewaySession>, GatewayError> {
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(message) = &self.failure {
            return Err(GatewayError::Other(message.clone()));
        }
        let session = Arc::new(StubSession {
            pages: self.pages.clone(),
            cursors: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        });
        self.sessions.lock().unwrap().push(Arc::clone(&session));
        Ok(session)
    }
}

// ============================================================================
// Runtime
// ============================================================================

#[derive(Clone)]
pub enum Step {
    Emit(AgentEvent),
    Fail(String),
}

pub struct ScriptedRuntimeFactory {
    steps: Vec<Step>,
    pub builds: Mutex<Vec<AgentSpec>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRuntimeFactory {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            builds: Mutex::new(Vec::new()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.lock().unwrap().len()
    }

    pub fn tool_names(&self, build: usize) -> Vec<String> {
        self.builds.lock().unwrap()[build]
            .tools
            .iter()
            .map(|tool| tool.name.clone())
            .collect()
    }
}

struct ScriptedRuntime {
    steps: Vec<Step>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl AgentRuntime for ScriptedRuntime {
    fn stream(self: Box<Self>, prompt: String) -> EventStream {
        self.prompts.lock().unwrap().push(prompt);
        let items: Vec<Result<AgentEvent, RuntimeError>> = self
            .steps
            .into_iter()
            .map(|step| match step {
                Step::Emit(event) => Ok(event),
                Step::Fail(message) => Err(RuntimeError::Other(message)),
            })
            .collect();
        Box::pin(futures::stream::iter(items))
    }
}

impl RuntimeFactory for ScriptedRuntimeFactory {
    fn build(&self, spec: AgentSpec, _session: Arc<dyn GatewaySession>) -> Box<dyn AgentRuntime> {
        self.builds.lock().unwrap().push(spec);
        Box::new(ScriptedRuntime {
            steps: self.steps.clone(),
            prompts: Arc::clone(&self.prompts),
        })
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub credentials: Arc<RecordingCredentials>,
    pub gateway: Arc<StubConnector>,
    pub runtime: Arc<ScriptedRuntimeFactory>,
}

impl Harness {
    pub fn new(gateway: StubConnector, steps: Vec<Step>) -> Self {
        Self {
            credentials: Arc::new(RecordingCredentials::default()),
            gateway: Arc::new(gateway),
            runtime: Arc::new(ScriptedRuntimeFactory::new(steps)),
        }
    }

    pub fn with_credentials(mut self, credentials: RecordingCredentials) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }

    pub fn agent(&self, env: Arc<dyn EnvSource>) -> SlackGatewayAgent {
        SlackGatewayAgent::new(
            env,
            self.credentials.clone(),
            self.gateway.clone(),
            self.runtime.clone(),
        )
    }
}
