//! OAuth2 client-credentials token provider for the gateway authorizer.

use crate::application::credentials::{AuthFlow, CredentialError, CredentialProvider, TokenRequest};
use crate::config::IdentitySettings;
use crate::config::defaults::HTTP_TIMEOUT;
use crate::domain::AccessToken;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Cached tokens are refreshed once they are this close to expiring.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub struct OAuthCredentialProvider {
    settings: IdentitySettings,
    http: Client,
    cache: Mutex<HashMap<String, AccessToken>>,
}

impl OAuthCredentialProvider {
    pub fn new(settings: IdentitySettings) -> Result<Self, CredentialError> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(CredentialError::Client)?;
        Ok(Self::with_client(settings, http))
    }

    pub fn with_client(settings: IdentitySettings, http: Client) -> Self {
        Self {
            settings,
            http,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(request: &TokenRequest) -> String {
        format!("{}|{}", request.provider_name, request.scopes.join(" "))
    }

    fn required<'a>(
        value: &'a Option<String>,
        var: &str,
        provider: &str,
    ) -> Result<&'a str, CredentialError> {
        value
            .as_deref()
            .ok_or_else(|| CredentialError::NotConfigured {
                provider: provider.to_string(),
                reason: format!("{var} is not set"),
            })
    }

    async fn cached(&self, key: &str) -> Option<AccessToken> {
        let cache = self.cache.lock().await;
        cache
            .get(key)
            .filter(|token| match token.expires_at() {
                Some(expires_at) => Instant::now() + EXPIRY_MARGIN < expires_at,
                None => false,
            })
            .cloned()
    }

    async fn request_token(&self, request: &TokenRequest) -> Result<AccessToken, CredentialError> {
        let provider = request.provider_name.as_str();
        let token_url = Self::required(&self.settings.token_url, "COGNITO_TOKEN_URL", provider)?;
        let client_id = Self::required(&self.settings.client_id, "COGNITO_CLIENT_ID", provider)?;
        let client_secret =
            Self::required(&self.settings.client_secret, "COGNITO_CLIENT_SECRET", provider)?;

        let scope = request.scopes.join(" ");
        let form = [("grant_type", "client_credentials"), ("scope", scope.as_str())];

        debug!(provider, token_url, "Posting client_credentials grant");
        let response = self
            .http
            .post(token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    warn!(provider, token_url, "Token endpoint timed out");
                    CredentialError::Timeout {
                        url: token_url.to_string(),
                        source,
                    }
                } else {
                    CredentialError::Transport {
                        provider: provider.to_string(),
                        source,
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(provider, status = status.as_u16(), "Token endpoint rejected the request");
            return Err(CredentialError::Rejected {
                provider: provider.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let grant: TokenResponse =
            response
                .json()
                .await
                .map_err(|err| CredentialError::InvalidResponse {
                    provider: provider.to_string(),
                    reason: err.to_string(),
                })?;

        if let Some(kind) = grant.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(CredentialError::InvalidResponse {
                    provider: provider.to_string(),
                    reason: format!("unexpected token_type '{kind}'"),
                });
            }
        }
        if grant.access_token.is_empty() {
            return Err(CredentialError::InvalidResponse {
                provider: provider.to_string(),
                reason: "empty access_token".to_string(),
            });
        }

        let mut token = AccessToken::new(grant.access_token);
        if let Some(seconds) = grant.expires_in {
            token = token.with_expiry(Instant::now() + Duration::from_secs(seconds));
        }
        Ok(token)
    }
}

#[async_trait]
impl CredentialProvider for OAuthCredentialProvider {
    async fn fetch_token(&self, request: &TokenRequest) -> Result<AccessToken, CredentialError> {
        if request.auth_flow != AuthFlow::M2M {
            return Err(CredentialError::UnsupportedFlow {
                provider: request.provider_name.clone(),
                flow: request.auth_flow.to_string(),
            });
        }

        let key = Self::cache_key(request);
        if !request.force_authentication {
            if let Some(token) = self.cached(&key).await {
                debug!(provider = request.provider_name.as_str(), "Reusing cached access token");
                return Ok(token);
            }
        }

        let token = self.request_token(request).await?;
        info!(
            provider = request.provider_name.as_str(),
            workload = request.workload_name.as_str(),
            "Issued access token"
        );
        self.cache.lock().await.insert(key, token.clone());
        Ok(token)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    token_type: Option<String>,
}
