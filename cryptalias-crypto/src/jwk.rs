//! Import of the configuration trust key.

use ed25519_dalek::VerifyingKey;
use tracing::debug;

use cryptalias_core::constants::ED25519_PUBLIC_KEY_SIZE;
use cryptalias_core::error::{CryptaliasError, Result};
use cryptalias_core::types::Jwk;

use crate::base64url;

/// Imports an OKP/Ed25519 JWK as a verifying key.
///
/// Wrong `kty`/`crv`, undecodable `x`, a length other than 32 bytes, or bytes
/// that are not a curve point all fail with [`CryptaliasError::SignatureInvalid`].
pub fn import_verifying_key(jwk: &Jwk) -> Result<VerifyingKey> {
    if !jwk.is_ed25519() {
        debug!(kty = %jwk.kty, crv = %jwk.crv, "Trust key is not OKP/Ed25519");
        return Err(CryptaliasError::SignatureInvalid);
    }

    let bytes = base64url::decode(&jwk.x).map_err(|e| {
        debug!(error = %e, "Trust key x is not base64url");
        CryptaliasError::SignatureInvalid
    })?;

    let raw: [u8; ED25519_PUBLIC_KEY_SIZE] = bytes.as_slice().try_into().map_err(|_| {
        debug!(len = bytes.len(), "Trust key has wrong length");
        CryptaliasError::SignatureInvalid
    })?;

    VerifyingKey::from_bytes(&raw).map_err(|e| {
        debug!(error = %e, "Trust key is not a valid Ed25519 point");
        CryptaliasError::SignatureInvalid
    })
}

/// Exports a verifying key as an OKP/Ed25519 JWK.
pub fn to_jwk(key: &VerifyingKey) -> Jwk {
    Jwk::ed25519(base64url::encode(key.as_bytes()))
}
