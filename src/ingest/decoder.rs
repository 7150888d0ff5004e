//! Encoded payload decoding
//!
//! First stage of the pipeline: base64 text in, raw audio bytes out.
//! Pure, no I/O.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::types::FileErrorKind;

/// Decode a base64 payload into raw audio bytes.
///
/// Emptiness is checked before base64 validity on both sides of the decode,
/// so an empty payload is always reported as `EmptyPayload` and never
/// misclassified as `InvalidEncoding`.
pub fn decode(encoded_data: &str) -> Result<Vec<u8>, FileErrorKind> {
    if encoded_data.is_empty() {
        return Err(FileErrorKind::EmptyPayload);
    }

    let raw = STANDARD
        .decode(encoded_data)
        .map_err(|_| FileErrorKind::InvalidEncoding)?;

    if raw.is_empty() {
        return Err(FileErrorKind::EmptyPayload);
    }

    Ok(raw)
}
