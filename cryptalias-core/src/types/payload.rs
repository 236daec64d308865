//! Payload of the signed resolver response, and the verified outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CryptaliasError, Result};

/// Decoded JSON body of the signed resolver response.
///
/// Only `address` and `expires` matter for a resolution; the other fields are
/// passed through to [`Resolution`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPayload {
    /// Payload format version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Ticker the resolver answered for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    /// Wallet address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// RFC 3339 expiry of this binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// Resolver-chosen nonce
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl ResolvedPayload {
    /// Returns the address, failing with [`CryptaliasError::MissingAddress`] if absent or empty.
    pub fn address(&self) -> Result<&str> {
        self.address
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or(CryptaliasError::MissingAddress)
    }
}

/// A verified, unexpired resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Wallet address
    pub address: String,
    /// Instant after which the binding must not be used
    pub expires: DateTime<Utc>,
    /// Ticker the resolver answered for, if it said
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    /// Resolver-chosen nonce, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Payload format version, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Domain taken from the alias
    pub domain: String,
    /// Resolver endpoint taken from the domain configuration
    pub resolver_endpoint: String,
}
