//! Module: store
//! Responsibility: the narrow collaborator contract the pagination core
//! consumes, plus the reference in-memory implementation.
//! Does not own: retries, credentials, or connection setup.

mod memory;

pub use memory::MemoryStore;

use crate::{db::query::TableQuery, key::EntityKey, traits::TableEntity};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// StoreError
///
/// Faults raised by a table store. The pagination layer propagates these
/// unchanged and never retries them.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    #[error("entity {key} already exists in table '{table}'")]
    EntityAlreadyExists { table: String, key: EntityKey },

    #[error("entity {key} not found in table '{table}'")]
    EntityNotFound { table: String, key: EntityKey },

    #[error("store state poisoned by a panicked writer")]
    Poisoned,

    #[error("store backend fault: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub(crate) fn table_not_found(table: &str) -> Self {
        Self::TableNotFound {
            table: table.to_string(),
        }
    }

    /// Construct a backend fault (network, auth, throttling, service error).
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

///
/// StoreCursor
///
/// Store-native resume position: the first key of the next segment.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreCursor {
    next_partition_key: String,
    next_row_key: Option<String>,
}

impl StoreCursor {
    #[must_use]
    pub fn new(next_partition_key: impl Into<String>, next_row_key: Option<String>) -> Self {
        Self {
            next_partition_key: next_partition_key.into(),
            next_row_key,
        }
    }

    /// Cursor resuming exactly at `key`.
    #[must_use]
    pub fn at(key: &EntityKey) -> Self {
        Self::new(key.partition_key(), Some(key.row_key().to_string()))
    }

    #[must_use]
    pub fn next_partition_key(&self) -> &str {
        &self.next_partition_key
    }

    #[must_use]
    pub fn next_row_key(&self) -> Option<&str> {
        self.next_row_key.as_deref()
    }

    /// First key a resumed scan may return (inclusive).
    #[must_use]
    pub fn start_key(&self) -> EntityKey {
        EntityKey::new(
            self.next_partition_key.clone(),
            self.next_row_key.clone().unwrap_or_default(),
        )
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Option<String>) {
        (self.next_partition_key, self.next_row_key)
    }
}

///
/// Segment
///
/// One bounded batch returned by a single store round-trip.
///

#[derive(Clone, Debug)]
pub struct Segment<E> {
    entities: Vec<E>,
    next_cursor: Option<StoreCursor>,
}

impl<E> Segment<E> {
    #[must_use]
    pub const fn new(entities: Vec<E>, next_cursor: Option<StoreCursor>) -> Self {
        Self {
            entities,
            next_cursor,
        }
    }

    #[must_use]
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    #[must_use]
    pub const fn next_cursor(&self) -> Option<&StoreCursor> {
        self.next_cursor.as_ref()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<E>, Option<StoreCursor>) {
        (self.entities, self.next_cursor)
    }
}

///
/// TableStore
///
/// Segment execution over one named table.
///

pub trait TableStore<E: TableEntity> {
    /// Hard per-segment cap, applied regardless of the requested bound.
    fn max_segment_size(&self) -> u32;

    /// Execute `query` from `cursor` (or the start of its scan range) and
    /// return at most `min(take, max_segment_size)` entities in key order.
    fn execute_segment(
        &self,
        table: &str,
        query: &TableQuery<E>,
        cursor: Option<&StoreCursor>,
    ) -> Result<Segment<E>, StoreError>;
}

///
/// TableAdmin
///
/// Table lifecycle.
///

pub trait TableAdmin {
    /// Returns `true` when the table was created by this call.
    fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError>;

    /// Returns `true` when the table existed and was removed.
    fn delete_table(&self, table: &str) -> Result<bool, StoreError>;

    fn table_exists(&self, table: &str) -> Result<bool, StoreError>;
}

///
/// TableWriter
///
/// Single-entity mutations.
///

pub trait TableWriter<E: TableEntity> {
    fn insert(&self, table: &str, entity: E) -> Result<(), StoreError>;

    fn insert_or_replace(&self, table: &str, entity: E) -> Result<(), StoreError>;

    fn update(&self, table: &str, entity: E) -> Result<(), StoreError>;

    fn delete(&self, table: &str, key: &EntityKey) -> Result<(), StoreError>;
}

//
// Shared-handle forwarding
//

macro_rules! forward_store_impls {
    ($($handle:ty),* $(,)?) => {
        $(
            impl<E: TableEntity, T: TableStore<E> + ?Sized> TableStore<E> for $handle {
                fn max_segment_size(&self) -> u32 {
                    (**self).max_segment_size()
                }

                fn execute_segment(
                    &self,
                    table: &str,
                    query: &TableQuery<E>,
                    cursor: Option<&StoreCursor>,
                ) -> Result<Segment<E>, StoreError> {
                    (**self).execute_segment(table, query, cursor)
                }
            }

            impl<T: TableAdmin + ?Sized> TableAdmin for $handle {
                fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError> {
                    (**self).create_table_if_not_exists(table)
                }

                fn delete_table(&self, table: &str) -> Result<bool, StoreError> {
                    (**self).delete_table(table)
                }

                fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
                    (**self).table_exists(table)
                }
            }

            impl<E: TableEntity, T: TableWriter<E> + ?Sized> TableWriter<E> for $handle {
                fn insert(&self, table: &str, entity: E) -> Result<(), StoreError> {
                    (**self).insert(table, entity)
                }

                fn insert_or_replace(&self, table: &str, entity: E) -> Result<(), StoreError> {
                    (**self).insert_or_replace(table, entity)
                }

                fn update(&self, table: &str, entity: E) -> Result<(), StoreError> {
                    (**self).update(table, entity)
                }

                fn delete(&self, table: &str, key: &EntityKey) -> Result<(), StoreError> {
                    (**self).delete(table, key)
                }
            }
        )*
    };
}

forward_store_impls!(&T, Arc<T>);
