//! Client configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use cryptalias_core::constants::{DEFAULT_DISCOVERY_SCHEME, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use cryptalias_core::error::{CryptaliasError, Result};

/// Environment variable overriding [`ClientConfig::discovery_scheme`].
pub const ENV_DISCOVERY_SCHEME: &str = "CRYPTALIAS_DISCOVERY_SCHEME";
/// Environment variable overriding [`ClientConfig::timeout_seconds`].
pub const ENV_TIMEOUT_SECS: &str = "CRYPTALIAS_TIMEOUT_SECS";
/// Environment variable overriding [`ClientConfig::user_agent`].
pub const ENV_USER_AGENT: &str = "CRYPTALIAS_USER_AGENT";

/// Resolution client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme used for `{scheme}://{domain}/.well-known/...` ("https"; "http" for local testing)
    pub discovery_scheme: String,
    /// Request timeout in seconds, applied to each HTTP request
    pub timeout_seconds: u64,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            discovery_scheme: DEFAULT_DISCOVERY_SCHEME.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl ClientConfig {
    /// Reads overrides from `CRYPTALIAS_*` environment variables.
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout_seconds = match std::env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring unparsable {}", ENV_TIMEOUT_SECS);
                defaults.timeout_seconds
            }),
            Err(_) => defaults.timeout_seconds,
        };

        Self {
            discovery_scheme: std::env::var(ENV_DISCOVERY_SCHEME).unwrap_or(defaults.discovery_scheme),
            timeout_seconds,
            user_agent: std::env::var(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
        }
    }

    /// Sets the discovery scheme.
    pub fn with_discovery_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.discovery_scheme = scheme.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the `User-Agent`.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Rejects schemes other than http/https and a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.discovery_scheme.as_str(), "https" | "http") {
            return Err(CryptaliasError::InvalidInput(format!(
                "unsupported discovery scheme: {}",
                self.discovery_scheme
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(CryptaliasError::InvalidInput("timeout must be at least one second".into()));
        }
        Ok(())
    }
}
