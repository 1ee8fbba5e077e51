//! Module: query
//! Responsibility: query strategies and the filtered-collection description
//! they produce.
//! Does not own: I/O; stores materialize a `TableQuery` when they execute it.

mod filter;

pub use filter::{Filter, ScanRange, TableQuery};

use crate::{key::EntityKey, traits::TableEntity};
use std::{fmt, num::NonZeroU32, sync::Arc};

///
/// Predicate
///
/// Caller-supplied per-entity test.
///

pub struct Predicate<E>(Arc<dyn Fn(&E) -> bool + Send + Sync>);

impl<E> Predicate<E> {
    pub fn new(test: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(test))
    }

    #[must_use]
    pub fn test(&self, entity: &E) -> bool {
        (self.0)(entity)
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

///
/// StrategyKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StrategyKind {
    ExactKey,
    PartitionScan,
    FullScan,
    Predicate,
}

impl StrategyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactKey => "exact_key",
            Self::PartitionScan => "partition_scan",
            Self::FullScan => "full_scan",
            Self::Predicate => "predicate",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// QueryStrategy
///
/// How to filter, and whether to bound, one scan over a table.
/// Continuation state is not part of the strategy; paged calls take the
/// token explicitly.
///

#[derive(Clone, Debug)]
pub enum QueryStrategy<E> {
    ExactKey {
        partition_key: String,
        row_key: String,
    },
    PartitionScan {
        partition_key: String,
    },
    FullScan,
    Predicate(Predicate<E>),
}

impl<E: TableEntity> QueryStrategy<E> {
    #[must_use]
    pub fn exact_key(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self::ExactKey {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    #[must_use]
    pub fn partition_scan(partition_key: impl Into<String>) -> Self {
        Self::PartitionScan {
            partition_key: partition_key.into(),
        }
    }

    #[must_use]
    pub const fn full_scan() -> Self {
        Self::FullScan
    }

    pub fn predicate(test: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Predicate::new(test))
    }

    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::ExactKey { .. } => StrategyKind::ExactKey,
            Self::PartitionScan { .. } => StrategyKind::PartitionScan,
            Self::FullScan => StrategyKind::FullScan,
            Self::Predicate(_) => StrategyKind::Predicate,
        }
    }

    /// Apply this strategy's filter without limiting the result count.
    #[must_use]
    pub fn execute_unbounded(&self, collection: TableQuery<E>) -> TableQuery<E> {
        match self.filter() {
            Some(filter) => collection.filter(filter),
            None => collection,
        }
    }

    /// Apply this strategy's filter and request at most `page_size` results.
    ///
    /// Exact-key lookups ignore the bound: a full composite key matches at
    /// most one entity.
    #[must_use]
    pub fn execute_bounded(
        &self,
        collection: TableQuery<E>,
        page_size: NonZeroU32,
    ) -> TableQuery<E> {
        let filtered = self.execute_unbounded(collection);

        match self {
            Self::ExactKey { .. } => filtered,
            _ => filtered.take(page_size),
        }
    }

    fn filter(&self) -> Option<Filter<E>> {
        match self {
            Self::ExactKey {
                partition_key,
                row_key,
            } => Some(Filter::Key(EntityKey::new(
                partition_key.clone(),
                row_key.clone(),
            ))),
            Self::PartitionScan { partition_key } => {
                Some(Filter::PartitionKey(partition_key.clone()))
            }
            Self::FullScan => None,
            Self::Predicate(predicate) => Some(Filter::Predicate(predicate.clone())),
        }
    }
}

///
/// TESTS
///
