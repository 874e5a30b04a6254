//! Base HTTP client with shared logic

use crate::infrastructure::model::types::ModelError;
use reqwest::Client;
use reqwest_eventsource::EventSource;
use reqwest_eventsource::retry::Never;
use serde::Serialize;

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub http: Client,
}

impl HttpClientBase {
    pub fn new(id: String, endpoint: String, api_key: Option<String>, http: Client) -> Self {
        Self {
            id,
            endpoint,
            api_key,
            http,
        }
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Open a server-sent event stream for a JSON POST with bearer auth.
    /// Reconnects are disabled; a dropped stream ends the turn.
    pub fn event_source<Req>(&self, url: &str, body: &Req) -> Result<EventSource, ModelError>
    where
        Req: Serialize,
    {
        let api_key = self.require_api_key()?;

        let builder = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .header("Accept", "text/event-stream")
            .json(body);

        let mut source = EventSource::new(builder)
            .map_err(|e| ModelError::stream(&self.id, e.to_string()))?;
        source.set_retry_policy(Box::new(Never));
        Ok(source)
    }

    fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(&self.id))
    }
}
