//! Module: page
//! Responsibility: turn one strategy + optional bound + optional token into
//! one typed page.
//! Does not own: precondition checks (repository) or segment limits (store).

use crate::{
    db::{
        cursor::ContinuationToken,
        query::{QueryStrategy, TableQuery},
        store::{StoreCursor, TableStore},
    },
    error::Error,
    obs::sink::{self, MetricsEvent},
    traits::TableEntity,
};
use derive_more::IntoIterator;
use std::{marker::PhantomData, num::NonZeroU32};

///
/// PageResult
///
/// One caller-facing page. `has_more_results()` is derived from the token,
/// so the two can never disagree.
///

#[derive(Clone, Debug, IntoIterator)]
pub struct PageResult<E> {
    #[into_iterator(owned, ref)]
    results: Vec<E>,
    continuation_token: Option<String>,
}

impl<E> PageResult<E> {
    #[must_use]
    pub const fn new(results: Vec<E>, continuation_token: Option<String>) -> Self {
        Self {
            results,
            continuation_token,
        }
    }

    #[must_use]
    pub fn results(&self) -> &[E] {
        &self.results
    }

    /// Opaque token resuming after this page, if the scan may continue.
    #[must_use]
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    /// True when a continuation token is present. More data *may* exist;
    /// following the token is the only way to find out.
    #[must_use]
    pub const fn has_more_results(&self) -> bool {
        self.continuation_token.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<E>, Option<String>) {
        (self.results, self.continuation_token)
    }
}

///
/// PageAssembler
///
/// Executes one strategy against one table and packages the raw segment.
/// Performs no retries; store faults propagate unchanged.
///

pub struct PageAssembler<'a, E, S> {
    store: &'a S,
    table: &'a str,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, E, S> PageAssembler<'a, E, S>
where
    E: TableEntity,
    S: TableStore<E>,
{
    #[must_use]
    pub const fn new(store: &'a S, table: &'a str) -> Self {
        Self {
            store,
            table,
            _marker: PhantomData,
        }
    }

    /// Decode `continuation` into a store cursor bound to this table.
    pub fn resume_cursor(&self, continuation: Option<&str>) -> Result<Option<StoreCursor>, Error> {
        let Some(token) =
            ContinuationToken::decode(continuation).map_err(Error::CorruptContinuationToken)?
        else {
            return Ok(None);
        };
        token
            .ensure_table(self.table)
            .map_err(Error::CorruptContinuationToken)?;

        Ok(token.store_cursor())
    }

    /// Encode a store cursor as opaque token text for this table.
    pub fn continuation_for(&self, cursor: Option<StoreCursor>) -> Result<Option<String>, Error> {
        cursor
            .map(|cursor| {
                ContinuationToken::from_store_cursor(self.table, cursor)
                    .encode()
                    .map_err(|err| Error::internal(err.to_string()))
            })
            .transpose()
    }

    /// Build the filtered, optionally bounded collection for `strategy`.
    #[must_use]
    pub fn collection(
        strategy: &QueryStrategy<E>,
        page_size: Option<NonZeroU32>,
    ) -> TableQuery<E> {
        match page_size {
            Some(page_size) => strategy.execute_bounded(TableQuery::new(), page_size),
            None => strategy.execute_unbounded(TableQuery::new()),
        }
    }

    /// Fetch exactly one segment and package it as a page.
    pub fn fetch_page(
        &self,
        strategy: &QueryStrategy<E>,
        page_size: Option<NonZeroU32>,
        continuation: Option<&str>,
    ) -> Result<PageResult<E>, Error> {
        let cursor = self.resume_cursor(continuation)?;
        let query = Self::collection(strategy, page_size);

        let (entities, next_cursor) = self
            .store
            .execute_segment(self.table, &query, cursor.as_ref())?
            .into_parts();
        let continuation_token = self.continuation_for(next_cursor)?;

        let rows = entities.len() as u64;
        let has_more = continuation_token.is_some();
        sink::record(MetricsEvent::SegmentFetched {
            table: self.table,
            strategy: strategy.kind(),
            rows,
            has_more,
        });
        tracing::debug!(
            table = self.table,
            strategy = %strategy.kind(),
            page_size = page_size.map(NonZeroU32::get),
            resumed = cursor.is_some(),
            rows,
            has_more,
            "page assembled"
        );

        Ok(PageResult::new(entities, continuation_token))
    }
}

///
/// TESTS
///
