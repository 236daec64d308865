//! # Cryptalias Client
//!
//! Resolves `[ticker:]alias$domain` identifiers into wallet addresses
//! signed by the domain's resolver.
//!
//! ```rust,ignore
//! use cryptalias_client::CryptaliasResolver;
//!
//! let resolver = CryptaliasResolver::new()?;
//! let address = resolver.resolve_address("xmr", "donations$example.com").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod clock;
pub mod config;
mod expiry;
mod http;
mod resolver;

pub use clock::{FixedClock, SystemClock};
pub use config::ClientConfig;
pub use expiry::{parse_expiry, ExpiryGuard};
pub use http::ReqwestFetcher;
pub use resolver::{CryptaliasResolver, DiscoveredDomain};

pub use cryptalias_core::{AddressResolver, CryptaliasError, ParsedAlias, Resolution, Result};
