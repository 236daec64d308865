//! Error types for cryptalias resolution.
//!
//! Every failure aborts the resolution and surfaces as exactly one of these
//! variants, so a caller can tell whether the fault lies in its input, the
//! domain's configuration, the resolver, or the signature/expiry check.

use thiserror::Error;

/// Result type alias using `CryptaliasError`.
pub type Result<T> = std::result::Result<T, CryptaliasError>;

/// Main error type for all cryptalias operations.
#[derive(Debug, Error)]
pub enum CryptaliasError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Ticker or alias was empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Alias does not match `[ticker:]alias$domain`.
    #[error("Invalid alias format: {0}")]
    InvalidAlias(String),

    /// The alias carries a ticker prefix that differs from the requested ticker.
    #[error("Ticker prefix \"{prefix}\" does not match \"{ticker}\"")]
    TickerMismatch { prefix: String, ticker: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // DISCOVERY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The configuration document request returned a non-2xx status.
    #[error("Configuration fetch failed with status {status}: {body}")]
    ConfigFetchFailed { status: u16, body: String },

    /// The configuration document is not a JSON object of the expected shape.
    #[error("Malformed configuration document: {0}")]
    MalformedConfiguration(String),

    /// `resolver.resolver_endpoint` is absent or empty.
    #[error("Missing resolver_endpoint in configuration")]
    MissingResolver,

    /// `key` is absent or carries no key material.
    #[error("Missing key in configuration")]
    MissingKey,

    // ═══════════════════════════════════════════════════════════════════════════
    // RESOLUTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The resolver request returned a non-2xx status.
    #[error("Resolve fetch failed with status {status}: {body}")]
    ResolveFetchFailed { status: u16, body: String },

    /// The signed response or its payload is structurally invalid.
    #[error("Malformed resolver response: {0}")]
    MalformedResponse(String),

    /// Signature did not verify against the trust key, or the key itself is unusable.
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// The verified payload has no address.
    #[error("Missing address in signed payload")]
    MissingAddress,

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPIRY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The verified payload has no expiry.
    #[error("Missing expires in signed payload")]
    MissingExpiry,

    /// The expiry is not an RFC 3339 timestamp.
    #[error("Invalid expires in signed payload: {0}")]
    InvalidExpiry(String),

    /// The expiry is not strictly in the future.
    #[error("Resolved address expired at {expires}")]
    Expired { expires: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The HTTP collaborator failed before producing a status (DNS, connect, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(String),
}

impl CryptaliasError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            CryptaliasError::InvalidInput(_) => "invalid_input",
            CryptaliasError::InvalidAlias(_) => "format_error",
            CryptaliasError::TickerMismatch { .. } => "ticker_mismatch",
            CryptaliasError::ConfigFetchFailed { .. } => "config_fetch_failed",
            CryptaliasError::MalformedConfiguration(_) => "malformed_configuration",
            CryptaliasError::MissingResolver => "missing_resolver",
            CryptaliasError::MissingKey => "missing_key",
            CryptaliasError::ResolveFetchFailed { .. } => "resolve_fetch_failed",
            CryptaliasError::MalformedResponse(_) => "malformed_response",
            CryptaliasError::SignatureInvalid => "signature_invalid",
            CryptaliasError::MissingAddress => "missing_address",
            CryptaliasError::MissingExpiry => "missing_expiry",
            CryptaliasError::InvalidExpiry(_) => "invalid_expiry",
            CryptaliasError::Expired { .. } => "expired",
            CryptaliasError::Transport(_) => "transport",
        }
    }

    /// Returns true if the caller's own input was rejected.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CryptaliasError::InvalidInput(_)
                | CryptaliasError::InvalidAlias(_)
                | CryptaliasError::TickerMismatch { .. }
        )
    }

    /// Returns true if the domain's configuration document is at fault.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CryptaliasError::ConfigFetchFailed { .. }
                | CryptaliasError::MalformedConfiguration(_)
                | CryptaliasError::MissingResolver
                | CryptaliasError::MissingKey
        )
    }

    /// Returns true if the signed response failed verification or its binding is stale.
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            CryptaliasError::MalformedResponse(_)
                | CryptaliasError::SignatureInvalid
                | CryptaliasError::MissingAddress
                | CryptaliasError::MissingExpiry
                | CryptaliasError::InvalidExpiry(_)
                | CryptaliasError::Expired { .. }
        )
    }

    /// Returns true if a later attempt might succeed (transport failure or 5xx).
    ///
    /// The library never retries on its own.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CryptaliasError::Transport(_) => true,
            CryptaliasError::ConfigFetchFailed { status, .. }
            | CryptaliasError::ResolveFetchFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
