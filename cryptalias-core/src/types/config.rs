//! The domain configuration document served at
//! `https://{domain}/.well-known/cryptalias/configuration`.
//!
//! Only `resolver.resolver_endpoint` and `key` are required by a client. The
//! remaining fields are carried for display and diagnostics.

use serde::{Deserialize, Serialize};

use crate::constants::{JWK_CRV_ED25519, JWK_KTY_OKP};
use crate::error::{CryptaliasError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// A domain's well-known configuration.
///
/// Every field is optional on the wire; [`resolver_endpoint`](Self::resolver_endpoint)
/// and [`trust_key`](Self::trust_key) enforce presence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfiguration {
    /// Document version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Domain the document describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// How the domain resolves aliases (e.g. "delegated")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver_mode: Option<String>,
    /// Where to send resolve queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverInfo>,
    /// Public key that signs resolver responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Jwk>,
}

/// The `resolver` object of the configuration document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverInfo {
    /// Base URL of the resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver_endpoint: Option<String>,
    /// Optional URL listing the domain's keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_endpoint: Option<String>,
}

impl DomainConfiguration {
    /// Parses a configuration document.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| CryptaliasError::MalformedConfiguration(e.to_string()))
    }

    /// Returns the resolver endpoint with trailing `/` removed.
    ///
    /// Fails with [`CryptaliasError::MissingResolver`] if absent or empty.
    pub fn resolver_endpoint(&self) -> Result<String> {
        let endpoint = self
            .resolver
            .as_ref()
            .and_then(|r| r.resolver_endpoint.as_deref())
            .map(|e| e.trim_end_matches('/'))
            .unwrap_or_default();

        if endpoint.is_empty() {
            return Err(CryptaliasError::MissingResolver);
        }
        Ok(endpoint.to_string())
    }

    /// Returns the trust key.
    ///
    /// Fails with [`CryptaliasError::MissingKey`] if absent or without key material.
    pub fn trust_key(&self) -> Result<&Jwk> {
        match &self.key {
            Some(key) if !key.x.is_empty() => Ok(key),
            _ => Err(CryptaliasError::MissingKey),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON WEB KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// A public key in JSON-Web-Key form.
///
/// Only OKP/Ed25519 keys are usable; shape checks happen at import time in
/// `cryptalias-crypto` so that every key problem surfaces as a signature failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type ("OKP")
    #[serde(default)]
    pub kty: String,
    /// Curve ("Ed25519")
    #[serde(default)]
    pub crv: String,
    /// Base64url raw public key
    #[serde(default)]
    pub x: String,
    /// Key ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Declared algorithm (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Declared use (informational)
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
}

impl Jwk {
    /// Creates an OKP/Ed25519 key from its base64url `x` value.
    pub fn ed25519(x: impl Into<String>) -> Self {
        Self {
            kty: JWK_KTY_OKP.into(),
            crv: JWK_CRV_ED25519.into(),
            x: x.into(),
            ..Default::default()
        }
    }

    /// Returns true if the key declares OKP/Ed25519.
    pub fn is_ed25519(&self) -> bool {
        self.kty == JWK_KTY_OKP && self.crv == JWK_CRV_ED25519
    }
}
