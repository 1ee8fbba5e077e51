//! Module: cursor
//! Responsibility: opaque continuation-token protocol (CBOR record, hex text).
//! Does not own: scan positioning or segment limits; those belong to the store.
//! Boundary: repositories hand token text in and get token text back.

mod error;
pub(crate) mod hex;
mod wire;


pub use error::TokenWireError;
pub use hex::HexDecodeError;

use crate::{
    db::store::StoreCursor,
    serialize::{decode_cbor, encode_cbor},
};
use wire::{ContinuationTokenWire, TokenVersion};

/// Upper bound on decoded token payload bytes.
pub const MAX_TOKEN_BYTES: usize = 8 * 1024;

///
/// ContinuationToken
///
/// Resumable scan position bound to one table.
/// Absent next keys mean "start from the beginning of the scan".
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContinuationToken {
    table: String,
    next_partition_key: Option<String>,
    next_row_key: Option<String>,
}

impl ContinuationToken {
    #[must_use]
    pub fn new(
        table: impl Into<String>,
        next_partition_key: Option<String>,
        next_row_key: Option<String>,
    ) -> Self {
        Self {
            table: table.into(),
            next_partition_key,
            next_row_key,
        }
    }

    /// Token positioned at the start of a scan over `table`.
    #[must_use]
    pub fn start(table: impl Into<String>) -> Self {
        Self::new(table, None, None)
    }

    /// Wrap a store-native cursor so it can travel as an opaque token.
    #[must_use]
    pub fn from_store_cursor(table: impl Into<String>, cursor: StoreCursor) -> Self {
        let (next_partition_key, next_row_key) = cursor.into_parts();

        Self::new(table, Some(next_partition_key), next_row_key)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn next_partition_key(&self) -> Option<&str> {
        self.next_partition_key.as_deref()
    }

    #[must_use]
    pub fn next_row_key(&self) -> Option<&str> {
        self.next_row_key.as_deref()
    }

    #[must_use]
    pub const fn is_start(&self) -> bool {
        self.next_partition_key.is_none() && self.next_row_key.is_none()
    }

    /// Store-native cursor for this position; `None` resumes from the start.
    #[must_use]
    pub fn store_cursor(&self) -> Option<StoreCursor> {
        self.next_partition_key
            .as_ref()
            .map(|pk| StoreCursor::new(pk.clone(), self.next_row_key.clone()))
    }

    /// Reject tokens minted for a different table.
    pub fn ensure_table(&self, table: &str) -> Result<(), TokenWireError> {
        if self.table == table {
            Ok(())
        } else {
            Err(TokenWireError::TableMismatch {
                expected: table.to_string(),
                found: self.table.clone(),
            })
        }
    }

    /// Encode this token as opaque text.
    pub fn encode(&self) -> Result<String, TokenWireError> {
        self.encode_with_version(TokenVersion::CURRENT.encode())
    }

    /// Decode opaque token text.
    ///
    /// Missing or blank text means "no token" and decodes to `None`.
    pub fn decode(text: Option<&str>) -> Result<Option<Self>, TokenWireError> {
        let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };

        let bytes = hex::from_hex(text)?;
        let wire: ContinuationTokenWire = decode_cbor(&bytes, MAX_TOKEN_BYTES)
            .map_err(|err| TokenWireError::decode(err.to_string()))?;

        // Unknown versions are rejected before any field is trusted.
        TokenVersion::decode(wire.version)
            .ok_or_else(|| TokenWireError::unsupported_version(wire.version))?;

        if wire.next_partition_key.is_none() && wire.next_row_key.is_some() {
            return Err(TokenWireError::RowKeyWithoutPartition);
        }

        Ok(Some(Self::new(
            wire.table,
            wire.next_partition_key,
            wire.next_row_key,
        )))
    }

    fn encode_with_version(&self, version: u8) -> Result<String, TokenWireError> {
        let wire = ContinuationTokenWire {
            version,
            table: self.table.clone(),
            next_partition_key: self.next_partition_key.clone(),
            next_row_key: self.next_row_key.clone(),
        };
        let bytes = encode_cbor(&wire).map_err(|err| TokenWireError::encode(err.to_string()))?;

        Ok(hex::to_hex(&bytes))
    }
}
