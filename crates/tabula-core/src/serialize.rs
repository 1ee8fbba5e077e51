//! CBOR payload encoding for values that travel as opaque text, such as
//! continuation tokens. Size policy is supplied by the caller.

use serde::{Serialize, de::DeserializeOwned};
use serde_cbor::{from_slice, to_vec};
use std::panic::{AssertUnwindSafe, catch_unwind};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SerializeError {
    #[error("cbor encode failed: {0}")]
    Encode(String),

    #[error("cbor decode failed: {0}")]
    Decode(String),

    #[error("payload of {len} bytes exceeds the {max_bytes} byte limit")]
    TooLarge { len: usize, max_bytes: usize },
}

/// Encode `value` as CBOR bytes.
pub fn encode_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializeError> {
    to_vec(value).map_err(|err| SerializeError::Encode(err.to_string()))
}

/// Decode CBOR bytes no longer than `max_bytes`.
///
/// The length check runs before any parsing. A panic inside the decoder is
/// reported as `Decode` and never unwinds into the caller.
pub fn decode_cbor<T: DeserializeOwned>(
    bytes: &[u8],
    max_bytes: usize,
) -> Result<T, SerializeError> {
    if bytes.len() > max_bytes {
        return Err(SerializeError::TooLarge {
            len: bytes.len(),
            max_bytes,
        });
    }

    match catch_unwind(AssertUnwindSafe(|| from_slice(bytes))) {
        Ok(decoded) => decoded.map_err(|err| SerializeError::Decode(err.to_string())),
        Err(_) => Err(SerializeError::Decode("decoder panicked".to_string())),
    }
}

///
/// TESTS
///
