//! [`KeyMaterial`]: derived key bytes that are wiped when dropped.

use common::SealError;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_LEN;
use crate::kdf;

/// Key bytes produced by the KDF.
///
/// Lives only for the duration of a seal/open call. The buffer is overwritten
/// with zeroes on drop and never printed, not even in debug builds.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Take ownership of raw key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Borrow the raw key bytes.
    ///
    /// Use for the immediate cryptographic operation only; do not store or log.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of key bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for KeyMaterial {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a cipher key of [`KEY_LEN`] bytes from `password` and `salt`.
///
/// # Errors
///
/// Returns [`SealError::InvalidParameter`] if `iterations` is zero.
pub fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Result<KeyMaterial, SealError> {
    kdf::derive(password, salt, iterations, KEY_LEN).map(KeyMaterial::from_bytes)
}
