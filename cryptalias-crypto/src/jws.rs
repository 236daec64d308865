//! Compact JWS verification for resolver responses.
//!
//! A response is `header.payload.signature`, each segment base64url without
//! padding. The signing input is the received `header.payload` text, byte for
//! byte. Verification is pinned to Ed25519:
//!
//! ```text
//! Ed25519.verify(trust_key, ascii(header "." payload), b64url_decode(signature))
//! ```
//!
//! The header is never decoded. A resolver cannot select a weaker algorithm by
//! declaring one.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use tracing::{debug, instrument, warn};

use cryptalias_core::constants::{COMPACT_JWS_SEGMENTS, ED25519_SIGNATURE_SIZE, JWS_ALG_EDDSA};
use cryptalias_core::error::{CryptaliasError, Result};
use cryptalias_core::types::{Jwk, ResolvedPayload};

use crate::base64url;
use crate::jwk::{import_verifying_key, to_jwk};

// ═══════════════════════════════════════════════════════════════════════════════
// COMPACT STRUCTURE
// ═══════════════════════════════════════════════════════════════════════════════

/// A compact JWS split into its three segments, borrowed from the response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactJws<'a> {
    signing_input: &'a str,
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> CompactJws<'a> {
    /// Splits a compact JWS.
    ///
    /// Surrounding whitespace is ignored. Anything other than exactly three
    /// non-empty dot-separated segments is [`CryptaliasError::MalformedResponse`].
    pub fn parse(compact: &'a str) -> Result<Self> {
        let compact = compact.trim();
        let parts: Vec<&str> = compact.split('.').collect();

        if parts.len() != COMPACT_JWS_SEGMENTS {
            return Err(CryptaliasError::MalformedResponse(format!(
                "expected {} JWS segments, got {}",
                COMPACT_JWS_SEGMENTS,
                parts.len()
            )));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(CryptaliasError::MalformedResponse("empty JWS segment".into()));
        }

        let (header, payload, signature) = (parts[0], parts[1], parts[2]);
        Ok(Self {
            signing_input: &compact[..header.len() + 1 + payload.len()],
            header,
            payload,
            signature,
        })
    }

    /// The `header.payload` text exactly as received.
    pub fn signing_input(&self) -> &'a str {
        self.signing_input
    }

    /// Encoded header segment.
    pub fn header_segment(&self) -> &'a str {
        self.header
    }

    /// Encoded payload segment.
    pub fn payload_segment(&self) -> &'a str {
        self.payload
    }

    /// Encoded signature segment.
    pub fn signature_segment(&self) -> &'a str {
        self.signature
    }

    /// Checks the Ed25519 signature over the signing input.
    pub fn verify_signature(&self, key: &VerifyingKey) -> Result<()> {
        let sig_bytes = base64url::decode(self.signature).map_err(|e| {
            debug!(error = %e, "Signature segment is not base64url");
            CryptaliasError::SignatureInvalid
        })?;
        let raw: [u8; ED25519_SIGNATURE_SIZE] = sig_bytes.as_slice().try_into().map_err(|_| {
            debug!(len = sig_bytes.len(), "Signature has wrong length");
            CryptaliasError::SignatureInvalid
        })?;
        let signature = Signature::from_bytes(&raw);

        key.verify_strict(self.signing_input.as_bytes(), &signature)
            .map_err(|_| CryptaliasError::SignatureInvalid)
    }

    /// Decodes the payload segment as JSON.
    ///
    /// Call only after [`verify_signature`](Self::verify_signature) succeeded.
    pub fn decode_payload(&self) -> Result<ResolvedPayload> {
        let bytes = base64url::decode(self.payload)
            .map_err(|e| CryptaliasError::MalformedResponse(format!("payload is not base64url: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CryptaliasError::MalformedResponse(format!("payload is not valid JSON: {e}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Verifies a compact JWS against the trust key and returns its decoded payload.
///
/// # Errors
/// - [`CryptaliasError::MalformedResponse`] for a bad structure or an
///   undecodable payload
/// - [`CryptaliasError::SignatureInvalid`] for any key or signature problem
#[instrument(skip_all)]
pub fn verify(compact: &str, trust_key: &Jwk) -> Result<ResolvedPayload> {
    let jws = CompactJws::parse(compact)?;
    let key = import_verifying_key(trust_key)?;

    if let Err(e) = jws.verify_signature(&key) {
        warn!(kid = ?trust_key.kid, "JWS signature rejected");
        return Err(e);
    }

    let payload = jws.decode_payload()?;
    debug!("JWS verified");
    Ok(payload)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIGNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Ed25519 compact-JWS signer, the counterpart of [`verify`].
///
/// Produces responses in the shape a resolver serves; used for fixtures and
/// local testing. Keys are never written anywhere.
pub struct JwsSigner {
    signing_key: SigningKey,
    kid: Option<String>,
}

impl JwsSigner {
    /// Creates a signer from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
            kid: None,
        }
    }

    /// Sets the `kid` written to headers and to the public JWK.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Public half as a JWK, as a domain would publish it.
    pub fn public_jwk(&self) -> Jwk {
        let mut jwk = to_jwk(&self.signing_key.verifying_key());
        jwk.kid = self.kid.clone();
        jwk.alg = Some(JWS_ALG_EDDSA.into());
        jwk
    }

    /// Signs raw payload bytes under an `{"alg":"EdDSA"}` header.
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut header = serde_json::json!({ "alg": JWS_ALG_EDDSA });
        if let Some(kid) = &self.kid {
            header["kid"] = serde_json::Value::String(kid.clone());
        }
        self.sign_with_header(header.to_string().as_bytes(), payload)
    }

    /// Signs a JSON payload.
    pub fn sign_json(&self, payload: &serde_json::Value) -> String {
        self.sign(payload.to_string().as_bytes())
    }

    /// Signs with caller-supplied header bytes.
    pub fn sign_with_header(&self, header: &[u8], payload: &[u8]) -> String {
        let signing_input = format!("{}.{}", base64url::encode(header), base64url::encode(payload));
        let signature = self.signing_key.sign(signing_input.as_bytes());
        format!("{}.{}", signing_input, base64url::encode(signature.to_bytes()))
    }
}
