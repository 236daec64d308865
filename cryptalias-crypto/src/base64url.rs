//! Base64url codec for JWS segments and JWK members.
//!
//! Segments are produced without padding, but a trailing `=` run is tolerated
//! on input. This is the same as substituting `-`→`+`, `_`→`/`, padding to a
//! multiple of four, and decoding as standard base64.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes base64url, with or without padding.
pub fn decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_LENIENT.decode(input)
}

/// Encodes as unpadded base64url.
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_LENIENT.encode(input)
}
