//! Standard base64 wrapping for text-only channels.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::SealError;

/// Encode `bytes` as padded standard base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode padded standard base64, ignoring leading and trailing whitespace.
///
/// # Errors
///
/// Returns [`SealError::MalformedEnvelope`] on an invalid alphabet or padding.
pub fn decode(text: &str) -> Result<Vec<u8>, SealError> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| SealError::MalformedEnvelope(format!("invalid base64: {e}")))
}
