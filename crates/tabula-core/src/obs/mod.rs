//! Observability: runtime counters and the sink abstraction.
//!
//! Pagination code never touches `obs::metrics` directly; every signal flows
//! through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

pub use metrics::{EventOps, EventReport, StrategyCounters, TableSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
