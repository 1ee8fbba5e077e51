use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// EntityKey
///
/// Owned composite identity of one table entity.
/// Ordering is partition key first, then row key, both lexicographic, which
/// is the scan order of the underlying table store.
///

#[derive(
    Clone, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("({partition_key}, {row_key})")]
pub struct EntityKey {
    partition_key: String,
    row_key: String,
}

impl EntityKey {
    #[must_use]
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    /// Smallest key inside one partition.
    #[must_use]
    pub fn partition_start(partition_key: impl Into<String>) -> Self {
        Self::new(partition_key, String::new())
    }

    #[must_use]
    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    #[must_use]
    pub fn row_key(&self) -> &str {
        &self.row_key
    }

    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.partition_key, self.row_key)
    }
}

/// True when a key component is empty or whitespace-only.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

///
/// TESTS
///
