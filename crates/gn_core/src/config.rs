use std::env;
use std::fmt;

/// Server-side environment variable, preferred.
pub const PRIMARY_API_KEY_VAR: &str = "NEWS_API_KEY";
/// Public fallback, kept for existing `.env` files.
pub const FALLBACK_API_KEY_VAR: &str = "NEXT_PUBLIC_NEWS_API_KEY";

/// The upstream credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Empty keys are treated as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Picks the primary value when set, otherwise the fallback.
    pub fn resolve(primary: Option<String>, fallback: Option<String>) -> Option<Self> {
        primary
            .and_then(Self::new)
            .or_else(|| fallback.and_then(Self::new))
    }

    pub fn from_env() -> Option<Self> {
        Self::resolve(
            env::var(PRIMARY_API_KEY_VAR).ok(),
            env::var(FALLBACK_API_KEY_VAR).ok(),
        )
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
