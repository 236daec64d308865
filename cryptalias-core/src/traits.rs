//! Common traits for cryptalias resolution.
//!
//! The resolver entry point and the collaborators it is built from. Transport
//! and time are injected so the pipeline can be exercised without a network
//! or a real clock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for resolving an alias and ticker into a verified address.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolves `alias` (`[ticker:]local$domain`) for `ticker`.
    ///
    /// # Flow
    /// 1. Parse the alias and cross-check any ticker prefix
    /// 2. Fetch the domain's well-known configuration
    /// 3. Fetch the signed response from the configured resolver
    /// 4. Verify the signature against the configured key
    /// 5. Reject missing or expired bindings
    async fn resolve_address(&self, ticker: &str, alias: &str) -> Result<String>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP TRANSPORT TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// A completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Interface for the HTTP GET collaborator.
///
/// Non-2xx responses are returned as values so the caller can attach its own
/// error kind. Only failures that never produced a status are errors.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Issues `GET url` with the given `Accept` header.
    async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the current instant for expiry checks.
pub trait Clock: Send + Sync {
    /// Returns the current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}
