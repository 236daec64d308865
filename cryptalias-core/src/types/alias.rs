//! Alias syntax: `[ticker:]local$domain`.
//!
//! The domain is whatever follows the **last** `$`. Anything before it is the
//! local part, optionally prefixed by `ticker:`. An earlier `$` inside the
//! local part is accepted as-is; the parser does not try to disambiguate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ALIAS_DOMAIN_SEPARATOR, ALIAS_TAG_SEPARATOR, ALIAS_TICKER_SEPARATOR};
use crate::error::{CryptaliasError, Result};

const FORMAT_HINT: &str = "expected [ticker:]alias$domain";

/// An alias split into its ticker prefix, local part and domain.
///
/// # Example
/// ```
/// use cryptalias_core::ParsedAlias;
///
/// let alias = ParsedAlias::parse("XMR:tips+stream$example.com").unwrap();
/// assert_eq!(alias.ticker_prefix.as_deref(), Some("xmr"));
/// assert_eq!(alias.local_with_prefix, "XMR:tips+stream");
/// assert_eq!(alias.local_part(), "tips+stream");
/// assert_eq!(alias.name(), "tips");
/// assert_eq!(alias.tag(), Some("stream"));
/// assert_eq!(alias.domain, "example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParsedAlias {
    /// Lower-cased ticker prefix, if the alias carried one
    pub ticker_prefix: Option<String>,
    /// Everything before the last `$`, prefix included, exactly as given
    pub local_with_prefix: String,
    /// Everything after the last `$`
    pub domain: String,
}

impl ParsedAlias {
    /// Parses and validates an alias.
    ///
    /// Fails with [`CryptaliasError::InvalidAlias`] when there is no `$`, the
    /// domain or local part is empty, the domain fails [`is_valid_domain`], or a
    /// `ticker:` prefix is malformed (empty ticker, empty local part, or a second
    /// `:` before the `$`).
    pub fn parse(alias: &str) -> Result<Self> {
        let idx = alias
            .rfind(ALIAS_DOMAIN_SEPARATOR)
            .ok_or_else(|| CryptaliasError::InvalidAlias(format!("missing '$' ({FORMAT_HINT})")))?;

        let (left, domain) = (&alias[..idx], &alias[idx + 1..]);
        if domain.is_empty() {
            return Err(CryptaliasError::InvalidAlias(format!("empty domain ({FORMAT_HINT})")));
        }
        if left.is_empty() {
            return Err(CryptaliasError::InvalidAlias(format!("empty alias ({FORMAT_HINT})")));
        }
        if !is_valid_domain(domain) {
            return Err(CryptaliasError::InvalidAlias(format!(
                "domain {domain:?} contains URL delimiters or whitespace"
            )));
        }

        Ok(Self {
            ticker_prefix: parse_ticker_prefix(left)?,
            local_with_prefix: left.to_string(),
            domain: domain.to_string(),
        })
    }

    /// The local part with any `ticker:` prefix removed.
    pub fn local_part(&self) -> &str {
        match self.ticker_prefix {
            Some(_) => self
                .local_with_prefix
                .split_once(ALIAS_TICKER_SEPARATOR)
                .map(|(_, local)| local)
                .unwrap_or(&self.local_with_prefix),
            None => &self.local_with_prefix,
        }
    }

    /// The alias name, i.e. the local part up to an optional `+tag`.
    pub fn name(&self) -> &str {
        let local = self.local_part();
        local
            .split_once(ALIAS_TAG_SEPARATOR)
            .map(|(name, _)| name)
            .unwrap_or(local)
    }

    /// The `+tag` suffix of the local part, if any.
    pub fn tag(&self) -> Option<&str> {
        self.local_part()
            .split_once(ALIAS_TAG_SEPARATOR)
            .map(|(_, tag)| tag)
            .filter(|tag| !tag.is_empty())
    }

    /// Checks the embedded ticker prefix, if any, against `ticker`.
    ///
    /// Both sides are compared lower-cased.
    pub fn check_ticker(&self, ticker: &str) -> Result<()> {
        let ticker = normalize_ticker(ticker);
        match &self.ticker_prefix {
            Some(prefix) if *prefix != ticker => Err(CryptaliasError::TickerMismatch {
                prefix: prefix.clone(),
                ticker,
            }),
            _ => Ok(()),
        }
    }
}

/// Extracts `ticker` from `ticker:local`, scoped to the text before the last `$`.
fn parse_ticker_prefix(left: &str) -> Result<Option<String>> {
    let Some(colon) = left.find(ALIAS_TICKER_SEPARATOR) else {
        return Ok(None);
    };

    let (ticker, local) = (&left[..colon], &left[colon + 1..]);
    if ticker.is_empty() {
        return Err(CryptaliasError::InvalidAlias(format!("empty ticker prefix ({FORMAT_HINT})")));
    }
    if local.is_empty() {
        return Err(CryptaliasError::InvalidAlias(format!("empty alias after ticker prefix ({FORMAT_HINT})")));
    }
    if local.contains(ALIAS_TICKER_SEPARATOR) {
        return Err(CryptaliasError::InvalidAlias(format!("more than one ':' ({FORMAT_HINT})")));
    }

    Ok(Some(ticker.to_lowercase()))
}

/// Returns true if `domain` can stand as the whole authority of
/// `scheme://{domain}/...` without moving the request to another host.
///
/// Rejects userinfo (`@`), path, query and fragment delimiters, backslashes,
/// whitespace and control characters.
pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && !domain
            .chars()
            .any(|c| matches!(c, '@' | '/' | '?' | '#' | '\\') || c.is_whitespace() || c.is_control())
}

/// Normalizes a ticker for comparison and for use in URLs (trim + lowercase).
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_lowercase()
}

impl FromStr for ParsedAlias {
    type Err = CryptaliasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ParsedAlias {
    type Error = CryptaliasError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ParsedAlias> for String {
    fn from(alias: ParsedAlias) -> Self {
        alias.to_string()
    }
}

impl fmt::Display for ParsedAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.local_with_prefix, ALIAS_DOMAIN_SEPARATOR, self.domain)
    }
}
