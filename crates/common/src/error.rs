//! Error taxonomy shared across crates.

use thiserror::Error;

/// Top-level error type for every derive, seal, and open operation.
///
/// Variants map to machine-readable codes and process exit statuses:
/// - [`SealError::InvalidParameter`] → `invalid_parameter` / 2
/// - [`SealError::CipherInit`] → `cipher_init` / 3
/// - [`SealError::MalformedEnvelope`] → `malformed_envelope` / 4
/// - [`SealError::AuthenticationFailed`] → `authentication_failed` / 5
/// - [`SealError::Serialization`] → `serialization` / 6
/// - [`SealError::Deserialization`] → `deserialization` / 7
#[derive(Debug, Error)]
pub enum SealError {
    /// A length or iteration count was zero or otherwise out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The stream cipher rejected the key or nonce length.
    #[error("cipher initialisation failed: {0}")]
    CipherInit(String),

    /// The input is too short to be an envelope or is not valid base64.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The embedded tag does not match. Carries no detail about where the
    /// comparison diverged.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// A value could not be encoded for sealing.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Opened bytes are not a complete, well-formed encoded value.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl SealError {
    /// Short machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            SealError::InvalidParameter(_) => "invalid_parameter",
            SealError::CipherInit(_) => "cipher_init",
            SealError::MalformedEnvelope(_) => "malformed_envelope",
            SealError::AuthenticationFailed => "authentication_failed",
            SealError::Serialization(_) => "serialization",
            SealError::Deserialization(_) => "deserialization",
        }
    }

    /// Process exit status reported by command-line front ends.
    pub fn exit_code(&self) -> u8 {
        match self {
            SealError::InvalidParameter(_) => 2,
            SealError::CipherInit(_) => 3,
            SealError::MalformedEnvelope(_) => 4,
            SealError::AuthenticationFailed => 5,
            SealError::Serialization(_) => 6,
            SealError::Deserialization(_) => 7,
        }
    }
}
