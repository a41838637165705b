//! Statistics for the chained hash table
//!
//! Table occupancy and chain-length metrics, lookup-cost metrics and the
//! report writer that renders them.

pub mod collector;
pub mod metrics;
pub mod reporter;

pub use collector::QueryStatsCollector;
pub use metrics::{QueryStats, TableStats};
pub use reporter::{ReportFormat, RunReport, StatsReporter, CSV_HEADER};
