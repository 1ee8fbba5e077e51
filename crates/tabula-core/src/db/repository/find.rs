use crate::{
    db::{
        page::PageAssembler,
        query::QueryStrategy,
        store::{StoreCursor, TableStore},
    },
    error::Error,
    obs::sink::{self, MetricsEvent, MetricsSink, with_metrics_sink},
    traits::TableEntity,
};
use std::{num::NonZeroU32, vec};

///
/// Find
///
/// Lazy sequence over one strategy's filtered collection.
/// Segments are fetched on demand and strictly in cursor order; the first
/// store fault is yielded once and ends the sequence. Segment events go to
/// the owning repository's sink when it has one.
///

pub struct Find<'a, E, S> {
    store: &'a S,
    table: &'a str,
    strategy: QueryStrategy<E>,
    limit: Option<NonZeroU32>,
    yielded: u32,
    buffer: vec::IntoIter<E>,
    cursor: Option<StoreCursor>,
    exhausted: bool,
    metrics: Option<&'static dyn MetricsSink>,
}

impl<'a, E, S> Find<'a, E, S>
where
    E: TableEntity,
    S: TableStore<E>,
{
    pub(crate) fn new(
        store: &'a S,
        table: &'a str,
        strategy: QueryStrategy<E>,
        limit: Option<NonZeroU32>,
        metrics: Option<&'static dyn MetricsSink>,
    ) -> Self {
        Self {
            store,
            table,
            strategy,
            limit,
            yielded: 0,
            buffer: Vec::new().into_iter(),
            cursor: None,
            exhausted: false,
            metrics,
        }
    }

    // Entities still allowed under the bound; `None` means unbounded.
    fn remaining(&self) -> Option<u32> {
        self.limit.map(|limit| limit.get().saturating_sub(self.yielded))
    }

    fn fetch_segment(&mut self) -> Result<(), Error> {
        let bound = self.remaining().and_then(NonZeroU32::new);
        let query = PageAssembler::<E, S>::collection(&self.strategy, bound);

        let (entities, next_cursor) = self
            .store
            .execute_segment(self.table, &query, self.cursor.as_ref())?
            .into_parts();

        let event = MetricsEvent::SegmentFetched {
            table: self.table,
            strategy: self.strategy.kind(),
            rows: entities.len() as u64,
            has_more: next_cursor.is_some(),
        };
        match self.metrics {
            Some(metrics) => with_metrics_sink(metrics, || sink::record(event)),
            None => sink::record(event),
        }

        self.exhausted = next_cursor.is_none();
        self.cursor = next_cursor;
        self.buffer = entities.into_iter();

        Ok(())
    }
}

impl<E, S> Iterator for Find<'_, E, S>
where
    E: TableEntity,
    S: TableStore<E>,
{
    type Item = Result<E, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining() == Some(0) {
                return None;
            }

            if let Some(entity) = self.buffer.next() {
                self.yielded = self.yielded.saturating_add(1);
                return Some(Ok(entity));
            }

            if self.exhausted {
                return None;
            }

            if let Err(err) = self.fetch_segment() {
                self.exhausted = true;
                return Some(Err(err));
            }
        }
    }
}
