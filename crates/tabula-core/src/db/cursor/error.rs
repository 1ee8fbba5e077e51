use crate::db::cursor::hex::HexDecodeError;
use thiserror::Error as ThisError;

///
/// TokenWireError
/// Continuation token encode/decode failures.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TokenWireError {
    #[error("failed to encode continuation token: {0}")]
    Encode(String),

    #[error("failed to decode continuation token: {0}")]
    Decode(String),

    #[error("malformed continuation token text: {0}")]
    Hex(#[from] HexDecodeError),

    #[error("unsupported continuation token version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("continuation token row key present without partition key")]
    RowKeyWithoutPartition,

    #[error("continuation token belongs to table '{found}', not '{expected}'")]
    TableMismatch { expected: String, found: String },
}

impl TokenWireError {
    pub(in crate::db::cursor) fn encode(reason: impl Into<String>) -> Self {
        Self::Encode(reason.into())
    }

    pub(in crate::db::cursor) fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }

    pub(in crate::db::cursor) const fn unsupported_version(version: u8) -> Self {
        Self::UnsupportedVersion { version }
    }
}
