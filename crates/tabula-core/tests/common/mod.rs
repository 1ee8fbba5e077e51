#![allow(dead_code)]

use tabula_core::{
    config::StoreConfig,
    db::{MemoryStore, TableAdmin, TableRepository, TableWriter},
    traits::TableEntity,
};

pub const TABLE: &str = "customers";

///
/// Customer
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Customer {
    pub region: String,
    pub id: String,
    pub visits: u32,
}

impl Customer {
    pub fn new(region: &str, index: u32) -> Self {
        Self {
            region: region.to_string(),
            id: format!("cust-{index:06}"),
            visits: index,
        }
    }
}

impl TableEntity for Customer {
    fn partition_key(&self) -> &str {
        &self.region
    }

    fn row_key(&self) -> &str {
        &self.id
    }
}

pub type Repo = TableRepository<Customer, MemoryStore<Customer>>;

/// Repository over a fresh store with `max_segment_size` and the given
/// `(region, count)` partitions.
pub fn repo_with(max_segment_size: u32, partitions: &[(&str, u32)]) -> Repo {
    let store = MemoryStore::with_config(&StoreConfig { max_segment_size });
    store
        .create_table_if_not_exists(TABLE)
        .expect("table should be created");

    for (region, count) in partitions {
        for index in 0..*count {
            store
                .insert(TABLE, Customer::new(region, index))
                .expect("seed insert should succeed");
        }
    }

    TableRepository::new(store, TABLE)
}

/// Repository with the default segment cap.
pub fn repo(partitions: &[(&str, u32)]) -> Repo {
    repo_with(StoreConfig::default().max_segment_size, partitions)
}
