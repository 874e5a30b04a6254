use super::error::GatewayError;
use super::interface::{GatewayConnector, GatewaySession};
use super::rpc;
use crate::config::defaults::{HTTP_TIMEOUT, STREAM_READ_TIMEOUT};
use crate::domain::{AccessToken, ToolPage};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SESSION_HEADER: &str = "mcp-session-id";
const PROTOCOL_HEADER: &str = "mcp-protocol-version";
const ACCEPT_BOTH: &str = "application/json, text/event-stream";

/// Opens MCP streamable-HTTP sessions against the tool gateway.
#[derive(Debug, Clone)]
pub struct StreamableHttpConnector {
    http: Client,
}

impl StreamableHttpConnector {
    /// Connects within [`HTTP_TIMEOUT`]; a response stalled for longer than
    /// [`STREAM_READ_TIMEOUT`] surfaces as [`GatewayError::Timeout`].
    pub fn new() -> Result<Self, GatewayError> {
        let http = Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .read_timeout(STREAM_READ_TIMEOUT)
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GatewayConnector for StreamableHttpConnector {
    async fn connect(
        &self,
        url: &str,
        token: &AccessToken,
    ) -> Result<Arc<dyn GatewaySession>, GatewayError> {
        info!(
            url,
            token_prefix = %format_args!("{}...", token.prefix()),
            "Opening gateway transport"
        );
        let session = HttpGatewaySession::open(self.http.clone(), url, token).await?;
        info!(
            url,
            session = session.session_id.as_deref().unwrap_or("<stateless>"),
            "Gateway transport ready"
        );
        Ok(Arc::new(session))
    }
}

/// One authenticated MCP session. Every request carries the bearer token;
/// the server-assigned session id is echoed once initialisation succeeds.
pub struct HttpGatewaySession {
    http: Client,
    url: String,
    authorization: String,
    session_id: Option<String>,
    protocol_version: String,
    id_counter: AtomicU64,
    closed: AtomicBool,
}

impl HttpGatewaySession {
    async fn open(http: Client, url: &str, token: &AccessToken) -> Result<Self, GatewayError> {
        let mut session = Self {
            http,
            url: url.to_string(),
            authorization: token.bearer_header(),
            session_id: None,
            protocol_version: PROTOCOL_VERSION.to_string(),
            id_counter: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        };

        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {}
        });
        let id = session.next_id();
        let response = session
            .post(&rpc::request(id, "initialize", params))
            .send()
            .await
            .map_err(|source| session.transport_error(source))?;
        session.session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let result = session.decode(response, id, "initialize").await?;
        if let Some(version) = result.get("protocolVersion").and_then(Value::as_str) {
            session.protocol_version = version.to_string();
        }
        debug!(
            protocol_version = session.protocol_version.as_str(),
            server = ?result.get("serverInfo"),
            "Gateway initialised"
        );

        session
            .send_notification("notifications/initialized", json!({}))
            .await?;
        Ok(session)
    }

    fn next_id(&self) -> u64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }

    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header(AUTHORIZATION, &self.authorization)
            .header(PROTOCOL_HEADER, &self.protocol_version);
        match &self.session_id {
            Some(id) => builder.header(SESSION_HEADER, id),
            None => builder,
        }
    }

    fn post(&self, body: &Value) -> RequestBuilder {
        self.with_headers(self.http.post(&self.url))
            .header(ACCEPT, ACCEPT_BOTH)
            .json(body)
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(GatewayError::Closed);
        }
        let id = self.next_id();
        let response = self
            .post(&rpc::request(id, method, params))
            .send()
            .await
            .map_err(|source| self.transport_error(source))?;
        self.decode(response, id, method).await
    }

    async fn send_notification(&self, method: &str, params: Value) -> Result<(), GatewayError> {
        let response = self
            .post(&rpc::notification(method, params))
            .send()
            .await
            .map_err(|source| self.transport_error(source))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn decode(
        &self,
        response: Response,
        id: u64,
        method: &str,
    ) -> Result<Value, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/event-stream"));
        let body = response
            .text()
            .await
            .map_err(|source| self.transport_error(source))?;

        let message = if is_event_stream {
            rpc::find_response(rpc::sse_messages(&body), id, method)?
        } else {
            serde_json::from_str(&body).map_err(|source| GatewayError::InvalidJson { source })?
        };
        rpc::into_result(message, method)
    }

    fn transport_error(&self, source: reqwest::Error) -> GatewayError {
        let url = self.url.clone();
        if source.is_timeout() {
            warn!(url = url.as_str(), "Gateway request timed out");
            GatewayError::Timeout { url, source }
        } else {
            GatewayError::Transport { url, source }
        }
    }

    fn delete_request(&self) -> Option<RequestBuilder> {
        self.session_id
            .as_ref()
            .map(|_| self.with_headers(self.http.delete(&self.url)))
    }
}

#[async_trait]
impl GatewaySession for HttpGatewaySession {
    async fn list_tools_page(&self, cursor: Option<&str>) -> Result<ToolPage, GatewayError> {
        let params = match cursor {
            Some(cursor) => json!({ "cursor": cursor }),
            None => json!({}),
        };
        let result = self.send_request("tools/list", params).await?;
        serde_json::from_value(result).map_err(|source| GatewayError::InvalidJson { source })
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, GatewayError> {
        let params = json!({
            "name": name,
            "arguments": match arguments {
                Value::Null => Value::Object(Default::default()),
                other => other,
            }
        });
        self.send_request("tools/call", params).await
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(request) = self.delete_request() else {
            debug!(url = self.url.as_str(), "Stateless gateway session released");
            return;
        };
        match request.send().await {
            Ok(response) => debug!(
                url = self.url.as_str(),
                status = response.status().as_u16(),
                "Gateway session released"
            ),
            Err(err) => warn!(url = self.url.as_str(), %err, "Failed to release gateway session"),
        }
    }
}

impl Drop for HttpGatewaySession {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(request) = self.delete_request() else {
            return;
        };
        // Abandoned mid-run: release on the ambient runtime if there is one.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            debug!(url = self.url.as_str(), "Releasing abandoned gateway session");
            handle.spawn(async move {
                let _ = request.send().await;
            });
        }
    }
}
