//! Value transport: structured values to and from bytes.
//!
//! Encoding is CBOR. Any `Serialize` type is accepted; [`common::Value`] is the
//! self-describing model used when the shape is not known in advance.
//! Decoding is strict: the input must hold exactly one complete value.

use common::SealError;
use serde::{de::DeserializeOwned, Serialize};

/// Encode `value` to bytes.
///
/// # Errors
///
/// Returns [`SealError::Serialization`] if the value refuses to serialise
/// (for example, a type wrapping an external resource handle).
pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>, SealError>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| SealError::Serialization(e.to_string()))?;
    Ok(buf)
}

/// Decode one value from `bytes`.
///
/// # Errors
///
/// Returns [`SealError::Deserialization`] if the input is truncated,
/// structurally invalid, of the wrong shape for `T`, or followed by trailing bytes.
pub fn from_bytes<T>(bytes: &[u8]) -> Result<T, SealError>
where
    T: DeserializeOwned,
{
    let mut reader = bytes;
    let value = ciborium::de::from_reader(&mut reader)
        .map_err(|e| SealError::Deserialization(e.to_string()))?;
    if !reader.is_empty() {
        return Err(SealError::Deserialization(format!(
            "{} trailing bytes after value",
            reader.len()
        )));
    }
    Ok(value)
}
