//! AES-256-CTR envelope primitives.
//!
//! This module is intentionally free of serialisation and text-encoding
//! concerns. It provides the stream cipher and the sealed envelope format.
//!
//! # Envelope format
//!
//! ```text
//! nonce (32) || ciphertext (= plaintext length) || tag (32)
//! tag = kdf::derive(password = nonce || ciphertext, salt = key, 1000, 32)
//! ```
//!
//! There is no version marker. Changing the tag construction would orphan
//! every stored envelope, so any migration needs a new framing first.

pub mod cipher;
pub mod envelope;

pub use cipher::KEY_LEN;
pub use envelope::{open, seal, seal_with_rng, Envelope, NONCE_LEN, TAG_LEN};
