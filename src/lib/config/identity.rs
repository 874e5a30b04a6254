use super::loader::{COGNITO_CLIENT_ID, COGNITO_CLIENT_SECRET, COGNITO_TOKEN_URL, EnvSource};
use std::fmt;

/// Client credentials for the OAuth2 token endpoint used by the M2M flow.
/// Every field is optional at load time; the provider reports the gap when
/// a token is actually requested.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IdentitySettings {
    pub token_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl IdentitySettings {
    pub fn from_source(source: &dyn EnvSource) -> Self {
        Self {
            token_url: source.non_blank(COGNITO_TOKEN_URL),
            client_id: source.non_blank(COGNITO_CLIENT_ID),
            client_secret: source.non_blank(COGNITO_CLIENT_SECRET),
        }
    }
}

impl fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
