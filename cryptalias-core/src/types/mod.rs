//! Domain types for cryptalias.
//!
//! - [`ParsedAlias`]: `[ticker:]local$domain` split into its parts
//! - [`DomainConfiguration`]: the well-known document naming the resolver and trust key
//! - [`Jwk`]: the trust key in JSON-Web-Key form
//! - [`ResolvedPayload`]: the decoded body of the signed resolver response
//! - [`Resolution`]: a verified, unexpired outcome

mod alias;
mod config;
mod payload;

pub use alias::*;
pub use config::*;
pub use payload::*;
