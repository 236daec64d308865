//! Expiry enforcement for resolved payloads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use cryptalias_core::error::{CryptaliasError, Result};
use cryptalias_core::traits::Clock;

/// Rejects payloads whose `expires` is missing, unparsable, or not after now.
#[derive(Clone)]
pub struct ExpiryGuard {
    clock: Arc<dyn Clock>,
}

impl ExpiryGuard {
    /// Creates a guard reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Checks `expires` and returns the parsed instant.
    ///
    /// A value equal to the current instant is already expired.
    pub fn enforce(&self, expires: Option<&str>) -> Result<DateTime<Utc>> {
        let raw = match expires {
            Some(value) if !value.trim().is_empty() => value,
            _ => return Err(CryptaliasError::MissingExpiry),
        };

        let expires = parse_expiry(raw)?;
        let now = self.clock.now();
        if expires <= now {
            warn!(%expires, %now, "Resolved payload has expired");
            return Err(CryptaliasError::Expired { expires: raw.to_string() });
        }
        Ok(expires)
    }
}

impl std::fmt::Debug for ExpiryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryGuard").finish_non_exhaustive()
    }
}

/// Parses an RFC 3339 timestamp (fractional seconds to nanosecond precision).
pub fn parse_expiry(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CryptaliasError::InvalidExpiry(format!("{value}: {e}")))
}
