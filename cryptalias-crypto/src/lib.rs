//! # Cryptalias Cryptography
//!
//! Verification of the compact signed structure a cryptalias resolver returns.
//!
//! This crate provides:
//!
//! - **Base64url**: segment decoding that accepts padded and unpadded input
//! - **JWK**: import of an OKP/Ed25519 JSON-Web-Key as a verifying key
//! - **JWS**: compact `header.payload.signature` parsing and Ed25519 verification
//!
//! ## Security Properties
//!
//! - The algorithm is pinned to Ed25519; the JWS header is never decoded
//! - Strict verification (`verify_strict`) rejects small-order keys and malleable signatures
//! - The payload is only decoded after the signature has verified
//! - Every key or signature problem surfaces as one error, `SignatureInvalid`
//!
//! ## Example
//!
//! ```rust
//! use cryptalias_crypto::{verify, JwsSigner};
//!
//! let signer = JwsSigner::from_seed(&[7u8; 32]);
//! let jws = signer.sign(br#"{"address":"4Ab9","expires":"2030-01-01T00:00:00Z"}"#);
//!
//! let payload = verify(&jws, &signer.public_jwk()).unwrap();
//! assert_eq!(payload.address.as_deref(), Some("4Ab9"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod base64url;
pub mod jwk;
pub mod jws;

// Re-export main functions at crate root
pub use jwk::{import_verifying_key, to_jwk};
pub use jws::{verify, CompactJws, JwsSigner};
