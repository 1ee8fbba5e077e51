use crate::{
    config::StoreConfig,
    db::{
        query::TableQuery,
        store::{Segment, StoreCursor, StoreError, TableAdmin, TableStore, TableWriter},
    },
    key::EntityKey,
    traits::TableEntity,
};
use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

type Rows<E> = BTreeMap<EntityKey, E>;

///
/// MemoryStore
///
/// In-process table store with table-service segment semantics: rows are
/// kept in key order, and every segment stops at the configured cap with a
/// cursor to the next unread key of the scan range.
///

#[derive(Debug)]
pub struct MemoryStore<E> {
    tables: RwLock<BTreeMap<String, Rows<E>>>,
    max_segment_size: u32,
}

impl<E: TableEntity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TableEntity> MemoryStore<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            tables: RwLock::new(BTreeMap::new()),
            max_segment_size: config.max_segment_size.max(1),
        }
    }

    /// Number of entities stored in `table`.
    pub fn len(&self, table: &str) -> Result<usize, StoreError> {
        let tables = self.read()?;

        tables
            .get(table)
            .map(BTreeMap::len)
            .ok_or_else(|| StoreError::table_not_found(table))
    }

    pub fn is_empty(&self, table: &str) -> Result<bool, StoreError> {
        self.len(table).map(|len| len == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Rows<E>>>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Rows<E>>>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }

    // Run one mutation against an existing table.
    fn mutate<R>(
        &self,
        table: &str,
        f: impl FnOnce(&mut Rows<E>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut tables = self.write()?;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::table_not_found(table))?;

        f(rows)
    }
}

impl<E: TableEntity> TableStore<E> for MemoryStore<E> {
    fn max_segment_size(&self) -> u32 {
        self.max_segment_size
    }

    fn execute_segment(
        &self,
        table: &str,
        query: &TableQuery<E>,
        cursor: Option<&StoreCursor>,
    ) -> Result<Segment<E>, StoreError> {
        let tables = self.read()?;
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::table_not_found(table))?;

        let range = query.scan_range();
        let start = match (range.start(), cursor.map(StoreCursor::start_key)) {
            (Some(range_start), Some(resume)) => Some(range_start.max(resume)),
            (range_start, resume) => range_start.or(resume),
        };
        let lower = start.map_or(Bound::Unbounded, Bound::Included);

        let limit = query.segment_limit(self.max_segment_size);
        let mut entities = Vec::new();
        let mut next_cursor = None;

        // Keys are visited in order; the scan stops at the first in-range key
        // past the limit, which becomes the resume position.
        for (key, entity) in rows
            .range((lower, Bound::Unbounded))
            .take_while(|(key, _)| range.contains(key))
        {
            if entities.len() == limit {
                next_cursor = Some(StoreCursor::at(key));
                break;
            }
            if query.matches(entity) {
                entities.push(entity.clone());
            }
        }

        tracing::trace!(
            table,
            returned = entities.len(),
            limit,
            has_more = next_cursor.is_some(),
            "memory store segment executed"
        );

        Ok(Segment::new(entities, next_cursor))
    }
}

impl<E: TableEntity> TableAdmin for MemoryStore<E> {
    fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if tables.contains_key(table) {
            return Ok(false);
        }
        tables.insert(table.to_string(), BTreeMap::new());

        Ok(true)
    }

    fn delete_table(&self, table: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.remove(table).is_some())
    }

    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.contains_key(table))
    }
}

impl<E: TableEntity> TableWriter<E> for MemoryStore<E> {
    fn insert(&self, table: &str, entity: E) -> Result<(), StoreError> {
        self.mutate(table, |rows| {
            let key = entity.entity_key();
            if rows.contains_key(&key) {
                return Err(StoreError::EntityAlreadyExists {
                    table: table.to_string(),
                    key,
                });
            }
            rows.insert(key, entity);

            Ok(())
        })
    }

    fn insert_or_replace(&self, table: &str, entity: E) -> Result<(), StoreError> {
        self.mutate(table, |rows| {
            rows.insert(entity.entity_key(), entity);

            Ok(())
        })
    }

    fn update(&self, table: &str, entity: E) -> Result<(), StoreError> {
        self.mutate(table, |rows| {
            let key = entity.entity_key();
            match rows.get_mut(&key) {
                Some(slot) => {
                    *slot = entity;
                    Ok(())
                }
                None => Err(StoreError::EntityNotFound {
                    table: table.to_string(),
                    key,
                }),
            }
        })
    }

    fn delete(&self, table: &str, key: &EntityKey) -> Result<(), StoreError> {
        self.mutate(table, |rows| {
            rows.remove(key)
                .map(|_| ())
                .ok_or_else(|| StoreError::EntityNotFound {
                    table: table.to_string(),
                    key: key.clone(),
                })
        })
    }
}

///
/// TESTS
///
