use serde::{Deserialize, Serialize};

///
/// TokenVersion
///
/// Wire-level token version owned by the cursor protocol boundary.
/// Keeps version parsing and compatibility behavior in one place.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(in crate::db::cursor) enum TokenVersion {
    V1,
}

impl TokenVersion {
    const V1_TAG: u8 = 1;

    pub(in crate::db::cursor) const CURRENT: Self = Self::V1;

    pub(in crate::db::cursor) const fn decode(raw: u8) -> Option<Self> {
        match raw {
            Self::V1_TAG => Some(Self::V1),
            _ => None,
        }
    }

    pub(in crate::db::cursor) const fn encode(self) -> u8 {
        match self {
            Self::V1 => Self::V1_TAG,
        }
    }
}

///
/// ContinuationTokenWire
///
/// Serialized shape of a continuation token. Field names follow the table
/// service's result-continuation record.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(in crate::db::cursor) struct ContinuationTokenWire {
    #[serde(rename = "ResultContinuation")]
    pub(in crate::db::cursor) version: u8,

    #[serde(rename = "Table")]
    pub(in crate::db::cursor) table: String,

    #[serde(rename = "NextPartitionKey", default)]
    pub(in crate::db::cursor) next_partition_key: Option<String>,

    #[serde(rename = "NextRowKey", default)]
    pub(in crate::db::cursor) next_row_key: Option<String>,
}
