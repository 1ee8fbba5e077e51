use crate::db::query::StrategyKind;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for pagination and write operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) strategies: StrategyCounters,
    pub(crate) tables: BTreeMap<String, TableCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Store round-trips
    pub segments_fetched: u64,
    pub rows_returned: u64,
    pub continuations_issued: u64,

    // Single-entity reads
    pub lookups: u64,
    pub lookup_misses: u64,

    // Full-list aggregation
    pub aggregate_calls: u64,
    pub aggregate_pages: u64,
    pub aggregate_rows: u64,

    // Write batches
    pub writes_applied: u64,
}

///
/// StrategyCounters
/// Segment fetches per query strategy.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StrategyCounters {
    pub exact_key: u64,
    pub partition_scan: u64,
    pub full_scan: u64,
    pub predicate: u64,
}

impl StrategyCounters {
    pub(crate) const fn bump(&mut self, kind: StrategyKind) {
        let slot = match kind {
            StrategyKind::ExactKey => &mut self.exact_key,
            StrategyKind::PartitionScan => &mut self.partition_scan,
            StrategyKind::FullScan => &mut self.full_scan,
            StrategyKind::Predicate => &mut self.predicate,
        };
        *slot = slot.saturating_add(1);
    }
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct TableCounters {
    pub(crate) segments_fetched: u64,
    pub(crate) rows_returned: u64,
    pub(crate) aggregate_calls: u64,
    pub(crate) writes_applied: u64,
}

///
/// EventReport
/// Point-in-time counter report.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub strategies: StrategyCounters,
    pub tables: Vec<TableSummary>,
}

///
/// TableSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TableSummary {
    pub table: String,
    pub segments_fetched: u64,
    pub rows_returned: u64,
    pub avg_rows_per_segment: f64,
    pub aggregate_calls: u64,
    pub writes_applied: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::default();
}

fn snapshot() -> EventState {
    EVENT_STATE.with(|state| state.borrow().clone())
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Per-table counters, created on first use.
pub(crate) fn table_entry<'a>(state: &'a mut EventState, table: &str) -> &'a mut TableCounters {
    state.tables.entry(table.to_string()).or_default()
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Build a report from the current counters.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = snapshot();

    let tables = snap
        .tables
        .iter()
        .map(|(table, counters)| TableSummary {
            table: table.clone(),
            segments_fetched: counters.segments_fetched,
            rows_returned: counters.rows_returned,
            avg_rows_per_segment: if counters.segments_fetched > 0 {
                counters.rows_returned as f64 / counters.segments_fetched as f64
            } else {
                0.0
            },
            aggregate_calls: counters.aggregate_calls,
            writes_applied: counters.writes_applied,
        })
        .collect();

    EventReport {
        ops: snap.ops,
        strategies: snap.strategies,
        tables,
    }
}
