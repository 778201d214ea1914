//! Iterated-HMAC key derivation with an XOR fold over every iterate.
//!
//! For each output block `i` (1-based):
//!
//! ```text
//! U1  = HMAC-SHA256(password, salt || be32(i))
//! Uj  = HMAC-SHA256(password, U(j-1))          for j in 2..=iterations
//! T_i = U1 ^ U2 ^ ... ^ U_iterations
//! ```
//!
//! The output is `T_1 || T_2 || ...` truncated to the requested length.
//!
//! **Do NOT substitute a library PBKDF2.** The fold and block layout here must
//! match existing stored envelopes bit for bit.

use common::SealError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Output size of the underlying keyed hash (HMAC-SHA256).
pub const HASH_LEN: usize = 32;

/// Validated KDF parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
    output_len: usize,
}

impl KdfParams {
    /// Build parameters for `iterations` rounds producing `output_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::InvalidParameter`] if either value is zero.
    pub fn new(iterations: u32, output_len: usize) -> Result<Self, SealError> {
        if iterations == 0 {
            return Err(SealError::InvalidParameter(
                "iterations must be at least 1".into(),
            ));
        }
        if output_len == 0 {
            return Err(SealError::InvalidParameter(
                "output length must be at least 1".into(),
            ));
        }
        if output_len.div_ceil(HASH_LEN) > u32::MAX as usize {
            return Err(SealError::InvalidParameter(format!(
                "output length {output_len} exceeds the block counter range"
            )));
        }
        Ok(Self {
            iterations,
            output_len,
        })
    }

    /// Number of HMAC rounds per output block.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Number of bytes produced.
    pub fn output_len(&self) -> usize {
        self.output_len
    }

    /// Run the KDF with these parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::InvalidParameter`] if the keyed hash rejects the password.
    pub fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>, SealError> {
        let keyed = HmacSha256::new_from_slice(password)
            .map_err(|e| SealError::InvalidParameter(format!("password rejected: {e}")))?;

        let block_count = self.output_len.div_ceil(HASH_LEN);
        let mut out = Vec::with_capacity(block_count * HASH_LEN);
        let mut u = [0u8; HASH_LEN];
        let mut acc = [0u8; HASH_LEN];

        for index in 1..=block_count as u32 {
            let mut mac = keyed.clone();
            mac.update(salt);
            mac.update(&index.to_be_bytes());
            u.copy_from_slice(&mac.finalize().into_bytes());
            acc.copy_from_slice(&u);

            for _ in 1..self.iterations {
                let mut mac = keyed.clone();
                mac.update(&u);
                u.copy_from_slice(&mac.finalize().into_bytes());
                acc.iter_mut().zip(u.iter()).for_each(|(a, b)| *a ^= b);
            }

            out.extend_from_slice(&acc);
        }

        out.truncate(self.output_len);
        Ok(out)
    }
}

/// Derive `output_len` bytes from `password` and `salt`.
///
/// Deterministic and side-effect free. Cost is linear in
/// `iterations × ceil(output_len / 32)`.
///
/// # Errors
///
/// Returns [`SealError::InvalidParameter`] if `iterations` or `output_len` is zero.
pub fn derive(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
) -> Result<Vec<u8>, SealError> {
    KdfParams::new(iterations, output_len)?.derive(password, salt)
}
