//! Sealing and opening of `nonce || ciphertext || tag` envelopes.
//!
//! The tag is the KDF itself run over `nonce || ciphertext` with the encryption
//! key as salt. This is not a vetted MAC construction and its security margin
//! is unverified, but it is kept bit-for-bit so existing envelopes still open.
//!
//! `open` checks structure, then key length, then the tag (constant time),
//! and only then decrypts. A rejected envelope never yields plaintext bytes.

use common::SealError;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::cipher::{self, CipherError, KEY_LEN};
use crate::kdf;

/// Byte length of the random nonce stored at the front of every envelope.
pub const NONCE_LEN: usize = 32;

/// Byte length of the trailing integrity tag.
pub const TAG_LEN: usize = 32;

/// KDF rounds used to compute the tag.
pub const TAG_ITERATIONS: u32 = 1000;

/// Shortest structurally valid envelope (empty plaintext).
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN;

/// A structurally valid, not yet authenticated envelope borrowed from a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// `nonce || ciphertext`: the region covered by the tag.
    authenticated: &'a [u8],
    tag: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split `bytes` into nonce, ciphertext, and tag.
    ///
    /// No cryptographic work happens here.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::MalformedEnvelope`] if `bytes` is shorter than
    /// [`MIN_ENVELOPE_LEN`].
    pub fn parse(bytes: &'a [u8]) -> Result<Self, SealError> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(SealError::MalformedEnvelope(format!(
                "expected at least {MIN_ENVELOPE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let (authenticated, tag) = bytes.split_at(bytes.len() - TAG_LEN);
        Ok(Self { authenticated, tag })
    }

    /// The random nonce.
    pub fn nonce(&self) -> &'a [u8] {
        &self.authenticated[..NONCE_LEN]
    }

    /// The encrypted payload.
    pub fn ciphertext(&self) -> &'a [u8] {
        &self.authenticated[NONCE_LEN..]
    }

    /// The embedded integrity tag.
    pub fn tag(&self) -> &'a [u8] {
        self.tag
    }

    /// Length of the plaintext this envelope decrypts to.
    pub fn plaintext_len(&self) -> usize {
        self.authenticated.len() - NONCE_LEN
    }

    /// Check the embedded tag against one recomputed under `key`.
    ///
    /// The comparison runs in constant time over the full tag length.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::AuthenticationFailed`] on mismatch.
    pub fn verify(&self, key: &[u8]) -> Result<(), SealError> {
        let expected = compute_tag(self.authenticated, key)?;
        if bool::from(expected.as_slice().ct_eq(self.tag)) {
            Ok(())
        } else {
            Err(SealError::AuthenticationFailed)
        }
    }

    /// Verify the tag, then decrypt.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::CipherInit`] if `key` is not [`KEY_LEN`] bytes.
    /// Returns [`SealError::AuthenticationFailed`] if the tag does not match.
    pub fn decrypt(&self, key: &[u8]) -> Result<Vec<u8>, SealError> {
        check_key(key)?;
        if let Err(e) = self.verify(key) {
            warn!(
                envelope_len = self.authenticated.len() + TAG_LEN,
                "envelope authentication failed"
            );
            return Err(e);
        }
        let mut plaintext = self.ciphertext().to_vec();
        cipher::apply_keystream(key, self.nonce(), &mut plaintext)?;
        Ok(plaintext)
    }
}

/// Seal `plaintext` under `key` with a fresh nonce from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`SealError::CipherInit`] if `key` is not [`KEY_LEN`] bytes.
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, SealError> {
    seal_with_rng(&mut OsRng, plaintext, key)
}

/// Seal `plaintext` under `key`, drawing the nonce from `rng`.
///
/// Each call draws a new nonce. Callers injecting their own source are
/// responsible for never repeating its output under the same key.
///
/// # Errors
///
/// Returns [`SealError::CipherInit`] if `key` is not [`KEY_LEN`] bytes.
pub fn seal_with_rng<R>(rng: &mut R, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, SealError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    check_key(key)?;

    let mut out = Vec::with_capacity(MIN_ENVELOPE_LEN + plaintext.len());
    out.resize(NONCE_LEN, 0);
    rng.fill_bytes(&mut out);
    out.extend_from_slice(plaintext);

    let (nonce, body) = out.split_at_mut(NONCE_LEN);
    cipher::apply_keystream(key, nonce, body)?;

    let tag = compute_tag(&out, key)?;
    out.extend_from_slice(&tag);

    debug!(plaintext_len = plaintext.len(), envelope_len = out.len(), "sealed envelope");
    Ok(out)
}

/// Authenticate and decrypt `envelope` under `key`.
///
/// # Errors
///
/// Returns [`SealError::MalformedEnvelope`] if the input is too short.
/// Returns [`SealError::CipherInit`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`SealError::AuthenticationFailed`] if the tag does not match.
pub fn open(envelope: &[u8], key: &[u8]) -> Result<Vec<u8>, SealError> {
    let parsed = Envelope::parse(envelope)?;
    let plaintext = parsed.decrypt(key)?;
    debug!(plaintext_len = plaintext.len(), "opened envelope");
    Ok(plaintext)
}

fn compute_tag(authenticated: &[u8], key: &[u8]) -> Result<Vec<u8>, SealError> {
    kdf::derive(authenticated, key, TAG_ITERATIONS, TAG_LEN)
}

fn check_key(key: &[u8]) -> Result<(), CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    Ok(())
}
