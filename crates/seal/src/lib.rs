//! Password-derived authenticated envelopes.
//!
//! Flow:
//!
//! ```text
//! value -> transport::to_bytes -> seal(bytes, key) -> [base64] -> storage
//! storage -> [base64 decode] -> open(blob, key) -> transport::from_bytes -> value
//! ```
//!
//! Every operation is synchronous and stateless. The only shared resource is
//! the OS random source used for nonces; calls on independent inputs need no
//! coordination.
//!
//! # Example
//!
//! ```
//! use seal::{derive_key, open_bytes, seal_bytes, Encoding};
//!
//! let key = derive_key(b"pw", b"salt", 1000)?;
//! let sealed = seal_bytes(b"hello", key.as_bytes(), Encoding::Base64)?;
//! let opened = open_bytes(&sealed, key.as_bytes(), Encoding::Base64)?;
//! assert_eq!(opened, b"hello");
//! # Ok::<(), seal::SealError>(())
//! ```

pub mod crypto;
pub mod kdf;
pub mod key;
pub mod text;
pub mod transport;

pub use common::{SealError, Value};
pub use crypto::{open, seal, seal_with_rng, Envelope, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use kdf::{derive, KdfParams};
pub use key::{derive_key, KeyMaterial};

use serde::{de::DeserializeOwned, Serialize};

/// Outer encoding of a sealed envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Binary envelope bytes.
    #[default]
    Raw,
    /// Standard base64 text (ASCII bytes) around the binary envelope.
    Base64,
}

impl Encoding {
    /// Map a "base64?" flag to an encoding.
    pub fn from_base64_flag(base64: bool) -> Self {
        if base64 {
            Encoding::Base64
        } else {
            Encoding::Raw
        }
    }
}

/// Seal `plaintext` under `key` and apply the outer `encoding`.
///
/// # Errors
///
/// Returns [`SealError::CipherInit`] if `key` is not [`KEY_LEN`] bytes.
pub fn seal_bytes(plaintext: &[u8], key: &[u8], encoding: Encoding) -> Result<Vec<u8>, SealError> {
    let envelope = crypto::seal(plaintext, key)?;
    Ok(match encoding {
        Encoding::Raw => envelope,
        Encoding::Base64 => text::encode(&envelope).into_bytes(),
    })
}

/// Strip the outer `encoding` from `input`, then authenticate and decrypt.
///
/// # Errors
///
/// Returns [`SealError::MalformedEnvelope`] for bad base64, non-UTF-8 text, or
/// a too-short envelope; [`SealError::CipherInit`] for a wrong-length key;
/// [`SealError::AuthenticationFailed`] on tag mismatch.
pub fn open_bytes(input: &[u8], key: &[u8], encoding: Encoding) -> Result<Vec<u8>, SealError> {
    match encoding {
        Encoding::Raw => crypto::open(input, key),
        Encoding::Base64 => {
            let encoded = std::str::from_utf8(input).map_err(|_| {
                SealError::MalformedEnvelope("base64 input is not valid UTF-8".into())
            })?;
            crypto::open(&text::decode(encoded)?, key)
        }
    }
}

/// Serialise `value` and seal the result.
///
/// # Errors
///
/// Returns [`SealError::Serialization`] if `value` cannot be encoded, plus any
/// error from [`seal_bytes`].
pub fn seal_value<T>(value: &T, key: &[u8], encoding: Encoding) -> Result<Vec<u8>, SealError>
where
    T: Serialize + ?Sized,
{
    let plaintext = transport::to_bytes(value)?;
    seal_bytes(&plaintext, key, encoding)
}

/// Open `input` and deserialise the plaintext.
///
/// # Errors
///
/// Any error from [`open_bytes`], or [`SealError::Deserialization`] if the
/// plaintext is not one complete encoded `T`.
pub fn open_value<T>(input: &[u8], key: &[u8], encoding: Encoding) -> Result<T, SealError>
where
    T: DeserializeOwned,
{
    let plaintext = open_bytes(input, key, encoding)?;
    transport::from_bytes(&plaintext)
}
