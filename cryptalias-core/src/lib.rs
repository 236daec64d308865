//! # Cryptalias Core
//!
//! Core types, errors, and traits for resolving cryptalias identifiers
//! (`[ticker:]alias$domain`) into signed wallet addresses.
//!
//! This crate provides the foundational building blocks used by the other crates:
//!
//! - **Types**: Alias parsing, the domain configuration document, the resolution payload
//! - **Errors**: One error kind per way a resolution can fail
//! - **Constants**: Well-known paths, media types, key sizes
//! - **Traits**: The resolver entry point and its injected collaborators (HTTP, clock)
//!
//! ## Example
//!
//! ```rust
//! use cryptalias_core::ParsedAlias;
//!
//! let alias = ParsedAlias::parse("xmr:donations$example.com").unwrap();
//! assert_eq!(alias.domain, "example.com");
//! assert_eq!(alias.ticker_prefix.as_deref(), Some("xmr"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{CryptaliasError, Result};
pub use traits::*;
pub use types::*;
