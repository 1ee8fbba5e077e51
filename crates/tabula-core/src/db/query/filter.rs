use crate::{db::query::Predicate, key::EntityKey, traits::TableEntity};
use std::num::NonZeroU32;

///
/// Filter
///
/// One conjunctive clause of a table query.
///

#[derive(Clone, Debug)]
pub enum Filter<E> {
    PartitionKey(String),
    Key(EntityKey),
    Predicate(Predicate<E>),
}

impl<E: TableEntity> Filter<E> {
    #[must_use]
    pub fn matches(&self, entity: &E) -> bool {
        match self {
            Self::PartitionKey(partition_key) => entity.partition_key() == partition_key,
            Self::Key(key) => {
                entity.partition_key() == key.partition_key() && entity.row_key() == key.row_key()
            }
            Self::Predicate(predicate) => predicate.test(entity),
        }
    }
}

///
/// ScanRange
///
/// Contiguous key range a query can be answered from.
/// Derived from the key-equality clauses; predicates never narrow it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScanRange {
    /// Contradictory key clauses; nothing can match.
    Empty,
    Key(EntityKey),
    Partition(String),
    Table,
}

impl ScanRange {
    #[must_use]
    pub fn contains(&self, key: &EntityKey) -> bool {
        match self {
            Self::Empty => false,
            Self::Key(target) => target == key,
            Self::Partition(partition_key) => key.partition_key() == partition_key,
            Self::Table => true,
        }
    }

    /// Smallest key inside the range, if the range is bounded below.
    #[must_use]
    pub fn start(&self) -> Option<EntityKey> {
        match self {
            Self::Key(key) => Some(key.clone()),
            Self::Partition(partition_key) => Some(EntityKey::partition_start(partition_key)),
            Self::Empty | Self::Table => None,
        }
    }

    // Intersect this range with one more key clause.
    fn narrow<E>(self, filter: &Filter<E>) -> Self {
        match (self, filter) {
            (Self::Empty, _) => Self::Empty,
            (range, Filter::Predicate(_)) => range,
            (Self::Table, Filter::PartitionKey(pk)) => Self::Partition(pk.clone()),
            (Self::Table, Filter::Key(key)) => Self::Key(key.clone()),
            (Self::Partition(current), Filter::PartitionKey(pk)) => {
                if current == *pk {
                    Self::Partition(current)
                } else {
                    Self::Empty
                }
            }
            (Self::Partition(current), Filter::Key(key)) => {
                if key.partition_key() == current {
                    Self::Key(key.clone())
                } else {
                    Self::Empty
                }
            }
            (Self::Key(current), Filter::PartitionKey(pk)) => {
                if current.partition_key() == pk {
                    Self::Key(current)
                } else {
                    Self::Empty
                }
            }
            (Self::Key(current), Filter::Key(key)) => {
                if current == *key {
                    Self::Key(current)
                } else {
                    Self::Empty
                }
            }
        }
    }
}

///
/// TableQuery
///
/// Filtered, optionally bounded description of a table collection.
/// Pure value; nothing is read until a store executes it.
///

#[derive(Clone, Debug)]
pub struct TableQuery<E> {
    filters: Vec<Filter<E>>,
    take: Option<NonZeroU32>,
}

impl<E> Default for TableQuery<E> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            take: None,
        }
    }
}

impl<E: TableEntity> TableQuery<E> {
    /// Unfiltered, unbounded collection over a whole table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter<E>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Request at most `count` entities; repeated calls keep the tightest bound.
    #[must_use]
    pub fn take(mut self, count: NonZeroU32) -> Self {
        self.take = Some(self.take.map_or(count, |current| current.min(count)));
        self
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter<E>] {
        &self.filters
    }

    #[must_use]
    pub const fn take_count(&self) -> Option<NonZeroU32> {
        self.take
    }

    #[must_use]
    pub fn matches(&self, entity: &E) -> bool {
        self.filters.iter().all(|filter| filter.matches(entity))
    }

    #[must_use]
    pub fn scan_range(&self) -> ScanRange {
        self.filters
            .iter()
            .fold(ScanRange::Table, |range, filter| range.narrow(filter))
    }

    /// Number of entities one segment may carry under a store-imposed cap.
    #[must_use]
    pub fn segment_limit(&self, max_segment_size: u32) -> usize {
        let cap = max_segment_size.max(1);
        let limit = self.take.map_or(cap, |take| take.get().min(cap));

        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}

///
/// TESTS
///
