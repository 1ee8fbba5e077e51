use crate::{
    db::store::{MemoryStore, TableAdmin, TableWriter},
    traits::TableEntity,
};

///
/// Person
/// Minimal table entity used by unit tests.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Person {
    pub(crate) partition_key: String,
    pub(crate) row_key: String,
    pub(crate) age: u32,
}

impl Person {
    pub(crate) fn new(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
        age: u32,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            age,
        }
    }
}

impl TableEntity for Person {
    fn partition_key(&self) -> &str {
        &self.partition_key
    }

    fn row_key(&self) -> &str {
        &self.row_key
    }
}

/// Build a default-configured store holding `table`, seeded with `count`
/// people per partition. Row keys are zero-padded so key order matches
/// insertion order, and `age` is the row index.
pub(crate) fn seeded_store(table: &str, partitions: &[(&str, u32)]) -> MemoryStore<Person> {
    let store = MemoryStore::new();
    store
        .create_table_if_not_exists(table)
        .expect("test table should be created");

    for (partition_key, count) in partitions {
        for row in 0..*count {
            store
                .insert(table, Person::new(*partition_key, format!("row-{row:05}"), row))
                .expect("seed insert should succeed");
        }
    }

    store
}
