//! Event routing between the pagination runtime and whatever records it.
//!
//! Paging code emits `MetricsEvent`s through `record`; the thread-local
//! override decides whether they reach a caller sink or the global counters.
use crate::{db::query::StrategyKind, obs::metrics};
use std::cell::Cell;

thread_local! {
    static SINK_OVERRIDE: Cell<Option<&'static dyn MetricsSink>> = const { Cell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    SegmentFetched {
        table: &'a str,
        strategy: StrategyKind,
        rows: u64,
        has_more: bool,
    },
    Lookup {
        table: &'a str,
        found: bool,
    },
    AggregateFinish {
        table: &'a str,
        pages: u64,
        rows: u64,
    },
    WritesApplied {
        table: &'a str,
        count: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

///
/// GlobalMetricsSink
/// Folds events into the thread-local counters in `obs::metrics`.
///

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::SegmentFetched {
                table,
                strategy,
                rows,
                has_more,
            } => metrics::with_state_mut(|m| {
                m.ops.segments_fetched = m.ops.segments_fetched.saturating_add(1);
                m.ops.rows_returned = m.ops.rows_returned.saturating_add(rows);
                if has_more {
                    m.ops.continuations_issued = m.ops.continuations_issued.saturating_add(1);
                }
                m.strategies.bump(strategy);

                let entry = metrics::table_entry(m, table);
                entry.segments_fetched = entry.segments_fetched.saturating_add(1);
                entry.rows_returned = entry.rows_returned.saturating_add(rows);
            }),

            MetricsEvent::Lookup { found, .. } => metrics::with_state_mut(|m| {
                m.ops.lookups = m.ops.lookups.saturating_add(1);
                if !found {
                    m.ops.lookup_misses = m.ops.lookup_misses.saturating_add(1);
                }
            }),

            MetricsEvent::AggregateFinish { table, pages, rows } => {
                metrics::with_state_mut(|m| {
                    m.ops.aggregate_calls = m.ops.aggregate_calls.saturating_add(1);
                    m.ops.aggregate_pages = m.ops.aggregate_pages.saturating_add(pages);
                    m.ops.aggregate_rows = m.ops.aggregate_rows.saturating_add(rows);

                    let entry = metrics::table_entry(m, table);
                    entry.aggregate_calls = entry.aggregate_calls.saturating_add(1);
                });
            }

            MetricsEvent::WritesApplied { table, count } => metrics::with_state_mut(|m| {
                m.ops.writes_applied = m.ops.writes_applied.saturating_add(count);

                let entry = metrics::table_entry(m, table);
                entry.writes_applied = entry.writes_applied.saturating_add(count);
            }),
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    match SINK_OVERRIDE.with(Cell::get) {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Counters recorded on this thread since the last reset.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: &'static dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<&'static dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| cell.set(self.0));
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.replace(Some(sink)));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
