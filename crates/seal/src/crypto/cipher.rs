//! AES-256-CTR keystream application.
//!
//! **Algorithm choice:** plain counter mode, no built-in authentication. The
//! envelope layer authenticates `nonce || ciphertext` separately and must verify
//! the tag before calling [`apply_keystream`] on received data.
//!
//! **Never reuse a nonce with the same key.** CTR nonce reuse leaks the XOR of
//! the two plaintexts.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the initial counter block consumed by the cipher.
pub const IV_LEN: usize = 16;

/// AES-256 in CTR mode with a full 128-bit big-endian counter.
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The nonce is shorter than one counter block.
    #[error("invalid nonce length: need at least {IV_LEN} bytes, got {0}")]
    InvalidNonceLength(usize),
}

impl From<CipherError> for common::SealError {
    fn from(e: CipherError) -> Self {
        common::SealError::CipherInit(e.to_string())
    }
}

/// XOR the AES-256-CTR keystream for `key` / `nonce` into `buf` in place.
///
/// Encryption and decryption are the same operation. Only the first
/// [`IV_LEN`] bytes of `nonce` seed the counter; longer nonces are accepted
/// so that the envelope can carry (and authenticate) a wider random field.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::InvalidNonceLength`] if `nonce` is shorter than [`IV_LEN`].
pub fn apply_keystream(key: &[u8], nonce: &[u8], buf: &mut [u8]) -> Result<(), CipherError> {
    let mut cipher = build_cipher(key, nonce)?;
    cipher.apply_keystream(buf);
    Ok(())
}

fn build_cipher(key: &[u8], nonce: &[u8]) -> Result<Aes256Ctr, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    if nonce.len() < IV_LEN {
        return Err(CipherError::InvalidNonceLength(nonce.len()));
    }
    Aes256Ctr::new_from_slices(key, &nonce[..IV_LEN])
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))
}
