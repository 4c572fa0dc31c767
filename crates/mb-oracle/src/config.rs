//! Oracle configuration
//!
//! Read from the environment. A missing or blank API key is a valid state
//! meaning "no live service", not an error.

use std::time::Duration;

/// Primary API key variable
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Secondary API key variable (shared with the web build)
pub const ENV_API_KEY_ALT: &str = "VITE_GEMINI_API_KEY";
/// Model override
pub const ENV_MODEL: &str = "MOOD_BLOSSOM_GEMINI_MODEL";
/// Endpoint base override
pub const ENV_ENDPOINT: &str = "MOOD_BLOSSOM_GEMINI_ENDPOINT";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Recommendation service settings
#[derive(Clone, PartialEq, Eq)]
pub struct OracleConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl OracleConfig {
    /// Build from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_blank(ENV_API_KEY).or_else(|| non_blank(ENV_API_KEY_ALT));
        let defaults = Self::default();

        Self {
            api_key: api_key.map(|k| k.trim().to_string()),
            model: non_blank(ENV_MODEL).unwrap_or(defaults.model),
            endpoint: non_blank(ENV_ENDPOINT)
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or(defaults.endpoint),
            timeout_ms: defaults.timeout_ms,
        }
    }

    /// Offline configuration (no credential)
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Whether a credential is present
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Never print the key
impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
