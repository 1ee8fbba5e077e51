//! Module: repository
//! Responsibility: public paged-read surface over one table, plus the
//! lifecycle and write-batch passthroughs the same handle carries.
//! Does not own: token format (cursor), segment limits (store).

mod batch;
mod find;

#[cfg(test)]
mod tests;

pub use batch::{WriteBatch, WriteBatchResponse, WriteOp};
pub use find::Find;

use crate::{
    db::{
        page::{PageAssembler, PageResult},
        query::QueryStrategy,
        store::{TableAdmin, TableStore, TableWriter},
    },
    error::Error,
    key::is_blank,
    obs::sink::{self, MetricsEvent, MetricsSink, with_metrics_sink},
    traits::TableEntity,
};
use std::{marker::PhantomData, num::NonZeroU32};

// Reject blank key arguments before any I/O.
fn require_key(argument: &'static str, value: &str) -> Result<(), Error> {
    if is_blank(value) {
        return Err(Error::invalid_argument(argument, "must not be blank"));
    }

    Ok(())
}

// Page sizes are optional; when present they must be positive.
fn require_page_size(page_size: Option<u32>) -> Result<Option<NonZeroU32>, Error> {
    match page_size {
        None => Ok(None),
        Some(size) => NonZeroU32::new(size)
            .map(Some)
            .ok_or_else(|| Error::invalid_argument("page_size", "must be greater than zero")),
    }
}

///
/// TableRepository
///
/// Table-scoped handle over a store collaborator. Holds no state between
/// calls apart from configuration; resumption state travels in the explicit
/// continuation token.
///

pub struct TableRepository<E, S> {
    store: S,
    table: String,
    metrics: Option<&'static dyn MetricsSink>,
    _marker: PhantomData<fn() -> E>,
}

impl<E, S> TableRepository<E, S>
where
    E: TableEntity,
    S: TableStore<E>,
{
    #[must_use]
    pub fn new(store: S, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            metrics: None,
            _marker: PhantomData,
        }
    }

    /// Route this repository's metrics to `sink` instead of the global state.
    #[must_use]
    pub fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn with_metrics<T>(&self, f: impl FnOnce() -> T) -> T {
        if let Some(sink) = self.metrics {
            with_metrics_sink(sink, f)
        } else {
            f()
        }
    }

    fn pages(&self) -> PageAssembler<'_, E, S> {
        PageAssembler::new(&self.store, &self.table)
    }

    // ---------------------------------------------------------------------
    // Single-entity reads
    // ---------------------------------------------------------------------

    /// Entity with exactly this composite key, or `None`.
    pub fn exact_lookup_first_or_default(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<E>, Error> {
        require_key("partition_key", partition_key)?;
        require_key("row_key", row_key)?;

        self.with_metrics(|| {
            let found = self.first_of(QueryStrategy::exact_key(partition_key, row_key))?;
            sink::record(MetricsEvent::Lookup {
                table: &self.table,
                found: found.is_some(),
            });

            Ok(found)
        })
    }

    /// First entity of an unbounded execution of `strategy`, or `None`.
    pub fn first_or_default(&self, strategy: &QueryStrategy<E>) -> Result<Option<E>, Error> {
        self.with_metrics(|| self.first_of(strategy.clone()))
    }

    /// First entity of an unbounded execution of `strategy`.
    /// Fails with `EmptyResult` when nothing matches.
    pub fn first(&self, strategy: &QueryStrategy<E>) -> Result<E, Error> {
        self.first_or_default(strategy)?
            .ok_or_else(|| Error::empty_result(&self.table))
    }

    fn first_of(&self, strategy: QueryStrategy<E>) -> Result<Option<E>, Error> {
        Find::new(&self.store, &self.table, strategy, None, self.metrics)
            .next()
            .transpose()
    }

    // ---------------------------------------------------------------------
    // Paged reads
    // ---------------------------------------------------------------------

    /// One page of the entities sharing `partition_key`.
    pub fn list_by_partition_key(
        &self,
        partition_key: &str,
        page_size: Option<u32>,
        continuation_token: Option<&str>,
    ) -> Result<PageResult<E>, Error> {
        require_key("partition_key", partition_key)?;
        let page_size = require_page_size(page_size)?;

        self.with_metrics(|| {
            self.pages().fetch_page(
                &QueryStrategy::partition_scan(partition_key),
                page_size,
                continuation_token,
            )
        })
    }

    /// One page of the whole table.
    pub fn list_all(
        &self,
        page_size: Option<u32>,
        continuation_token: Option<&str>,
    ) -> Result<PageResult<E>, Error> {
        let page_size = require_page_size(page_size)?;

        self.with_metrics(|| {
            self.pages()
                .fetch_page(&QueryStrategy::full_scan(), page_size, continuation_token)
        })
    }

    /// Lazy sequence over the filtered collection.
    ///
    /// Without a page size the sequence follows store cursors across the
    /// whole table; with one it stops after `page_size` entities.
    pub fn find(
        &self,
        strategy: &QueryStrategy<E>,
        page_size: Option<u32>,
    ) -> Result<Find<'_, E, S>, Error> {
        let page_size = require_page_size(page_size)?;

        Ok(Find::new(
            &self.store,
            &self.table,
            strategy.clone(),
            page_size,
            self.metrics,
        ))
    }
}

impl<E, S> TableRepository<E, S>
where
    E: TableEntity,
    S: TableStore<E> + TableAdmin,
{
    /// Returns `true` when the table was created by this call.
    pub fn create_table_if_not_exists(&self) -> Result<bool, Error> {
        Ok(self.store.create_table_if_not_exists(&self.table)?)
    }

    /// Returns `true` when the table existed and was removed.
    pub fn delete_table(&self) -> Result<bool, Error> {
        Ok(self.store.delete_table(&self.table)?)
    }
}

impl<E, S> TableRepository<E, S>
where
    E: TableEntity,
    S: TableStore<E> + TableWriter<E>,
{
    /// Apply every recorded change in order.
    ///
    /// Not transactional: the first failing change aborts the batch and
    /// changes applied before it stay applied.
    pub fn save_changes(&self, batch: WriteBatch<E>) -> Result<WriteBatchResponse, Error> {
        batch.validate()?;

        self.with_metrics(|| {
            let mut applied = 0usize;
            let result = batch.into_ops().into_iter().try_for_each(|op| {
                op.apply(&self.store, &self.table)?;
                applied += 1;

                Ok::<(), Error>(())
            });

            sink::record(MetricsEvent::WritesApplied {
                table: &self.table,
                count: applied as u64,
            });
            tracing::debug!(table = %self.table, applied, ok = result.is_ok(), "write batch saved");

            result.map(|()| WriteBatchResponse::new(applied))
        })
    }
}
