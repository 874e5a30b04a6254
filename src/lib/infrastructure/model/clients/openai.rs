//! OpenAI-compatible streaming client implementation

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Error as EventSourceError, Event};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ModelSettings;
use crate::config::defaults::{HTTP_TIMEOUT, STREAM_READ_TIMEOUT};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{
    ModelDelta, ModelError, ModelRequest, ModelStream, ToolCallFragment,
};

const PROVIDER_ID: &str = "openai-compatible";
const DEFAULT_API_PATH: &str = "/chat/completions";
const DONE_SENTINEL: &str = "[DONE]";

/// OpenAI-compatible chat completions client (Bedrock runtime, OpenAI, Groq, etc.)
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAIClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .read_timeout(STREAM_READ_TIMEOUT)
            .build()
            .map_err(|source| ModelError::Client {
                provider: PROVIDER_ID.to_string(),
                source,
            })?;
        Ok(Self::with_client(endpoint, api_key, http))
    }

    pub fn with_client(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base: HttpClientBase::new(PROVIDER_ID.to_string(), endpoint.into(), api_key, http),
            api_path: DEFAULT_API_PATH.to_string(),
        }
    }

    pub fn from_settings(settings: &ModelSettings) -> Result<Self, ModelError> {
        Self::new(settings.endpoint.clone(), settings.api_key.clone())
    }
}

#[async_trait]
impl ModelProvider for OpenAIClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn stream_chat(&self, request: ModelRequest) -> Result<ModelStream, ModelError> {
        let url = self.base.build_url(&self.api_path);

        let tools = MessageAdapter::to_openai_tools(&request.tools);
        let payload = OpenAIRequest {
            model: request.model.clone(),
            messages: MessageAdapter::to_openai_format(&request.messages),
            tool_choice: (!tools.is_empty()).then_some("auto"),
            tools,
            stream: true,
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending streaming request to OpenAI-compatible provider"
        );

        let mut source = self.base.event_source(&url, &payload)?;
        let provider = self.base.id.clone();
        let endpoint = url;

        let stream = try_stream! {
            while let Some(event) = source.next().await {
                match event {
                    Ok(Event::Open) => debug!(provider = provider.as_str(), "Model stream opened"),
                    Ok(Event::Message(message)) => {
                        let data = message.data.trim();
                        if data == DONE_SENTINEL {
                            break;
                        }
                        for delta in parse_chunk(&provider, data)? {
                            yield delta;
                        }
                    }
                    Err(EventSourceError::StreamEnded) => break,
                    Err(EventSourceError::InvalidStatusCode(status, response)) => {
                        let body = response.text().await.unwrap_or_default();
                        Err(ModelError::status(&provider, status.as_u16(), body))?;
                    }
                    Err(EventSourceError::Transport(err)) => {
                        Err(ModelError::transport(&provider, &endpoint, err))?;
                    }
                    Err(other) => {
                        Err(ModelError::stream(&provider, other.to_string()))?;
                    }
                }
            }
            source.close();
            debug!(provider = provider.as_str(), "Model stream closed");
        };

        Ok(Box::pin(stream))
    }
}

/// Decode one `chat.completion.chunk` into deltas. Chunks without choices
/// (usage reports, keep-alives) produce nothing.
fn parse_chunk(provider: &str, data: &str) -> Result<Vec<ModelDelta>, ModelError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let chunk: StreamChunk = serde_json::from_str(data)
        .map_err(|e| ModelError::invalid_response(provider, format!("undecodable chunk: {e}")))?;

    let mut deltas = Vec::new();
    for choice in chunk.choices {
        let delta = choice.delta.unwrap_or_default();
        if let Some(text) = delta.content.filter(|text| !text.is_empty()) {
            deltas.push(ModelDelta::Text(text));
        }
        for call in delta.tool_calls.unwrap_or_default() {
            let (name, arguments) = match call.function {
                Some(function) => (function.name, function.arguments.unwrap_or_default()),
                None => (None, String::new()),
            };
            deltas.push(ModelDelta::ToolCall(ToolCallFragment {
                index: call.index,
                id: call.id,
                name,
                arguments,
            }));
        }
        if let Some(reason) = choice.finish_reason {
            deltas.push(ModelDelta::Finish(reason));
        }
    }
    Ok(deltas)
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    stream: bool,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Option<StreamDelta>,
    finish_reason: Option<String>,
}

#[derive(Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Deserialize)]
struct ToolCallDelta {
    #[serde(default)]
    index: u32,
    id: Option<String>,
    function: Option<FunctionDelta>,
}

#[derive(Deserialize)]
struct FunctionDelta {
    name: Option<String>,
    arguments: Option<String>,
}
