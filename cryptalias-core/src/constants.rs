//! Protocol constants for cryptalias resolution.
//!
//! Paths and media types are fixed by the protocol; every client speaking it
//! must use the same values.

// ═══════════════════════════════════════════════════════════════════════════════
// DISCOVERY & RESOLUTION PATHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Path of the domain configuration document, relative to `{scheme}://{domain}`.
pub const WELL_KNOWN_CONFIGURATION_PATH: &str = "/.well-known/cryptalias/configuration";

/// Path prefix of the resolver endpoint. Followed by `/{ticker}/{alias}`.
pub const RESOLVE_PATH_PREFIX: &str = "/_cryptalias/resolve";

/// Scheme used to reach a domain's configuration document.
pub const DEFAULT_DISCOVERY_SCHEME: &str = "https";

// ═══════════════════════════════════════════════════════════════════════════════
// MEDIA TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// `Accept` header for the configuration document.
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// `Accept` header for the signed resolution response (compact JWS).
pub const MEDIA_TYPE_JOSE: &str = "application/jose";

// ═══════════════════════════════════════════════════════════════════════════════
// KEY MATERIAL
// ═══════════════════════════════════════════════════════════════════════════════

/// JWK key type for Edwards-curve keys.
pub const JWK_KTY_OKP: &str = "OKP";

/// JWK curve name for Ed25519.
pub const JWK_CRV_ED25519: &str = "Ed25519";

/// JWS algorithm name written into headers when signing. Verification never reads it.
pub const JWS_ALG_EDDSA: &str = "EdDSA";

/// Size of a raw Ed25519 public key in bytes.
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of a raw Ed25519 signature in bytes.
pub const ED25519_SIGNATURE_SIZE: usize = 64;

/// Number of dot-separated segments in a compact JWS.
pub const COMPACT_JWS_SEGMENTS: usize = 3;

// ═══════════════════════════════════════════════════════════════════════════════
// ALIAS SYNTAX
// ═══════════════════════════════════════════════════════════════════════════════

/// Separator between the local part and the domain. The last occurrence wins.
pub const ALIAS_DOMAIN_SEPARATOR: char = '$';

/// Separator between an optional ticker prefix and the local part.
pub const ALIAS_TICKER_SEPARATOR: char = ':';

/// Separator between the alias name and an optional tag.
pub const ALIAS_TAG_SEPARATOR: char = '+';

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSPORT DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default request timeout applied by the bundled HTTP transport.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default `User-Agent` sent by the bundled HTTP transport.
pub const DEFAULT_USER_AGENT: &str = concat!("cryptalias-rs/", env!("CARGO_PKG_VERSION"));
