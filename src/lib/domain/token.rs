use std::fmt;
use std::time::Instant;

/// Maximum number of characters of a token that may appear in logs.
pub const TOKEN_PREFIX_CHARS: usize = 20;

/// Short-lived bearer credential. Never logged in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: Instant) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.secret.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    /// Leading characters safe to log, at most [`TOKEN_PREFIX_CHARS`].
    pub fn prefix(&self) -> &str {
        match self.secret.char_indices().nth(TOKEN_PREFIX_CHARS) {
            Some((index, _)) => &self.secret[..index],
            None => &self.secret,
        }
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.secret)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("prefix", &format_args!("{}...", self.prefix()))
            .field("len", &self.len())
            .finish()
    }
}
