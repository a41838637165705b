//! chainstat - A separate-chaining hash table with load and probe statistics
//!
//! This crate indexes a fixed dataset of records by an integer key and
//! reports how the keys spread over the buckets and how much each lookup
//! costs:
//! - **Index**: a fixed-size array of bucket chains, `id mod M` addressing
//! - **Statistics**: occupancy, chain-length distribution, probe counts
//! - **Experiment**: load a CSV dataset and a query list, run them against
//!   several table sizes and write one report per size
//!
//! # Quick Start
//!
//! ```rust
//! use chainstat::{ChainedHashTable, Record};
//!
//! let mut table = ChainedHashTable::new(10)?;
//! for id in [5, 15, 25] {
//!     table.insert(Record::new(id, format!("player {id}"), "ST"));
//! }
//!
//! let outcome = table.search(15);
//! assert!(outcome.found());
//! assert_eq!(outcome.probes, 2);
//!
//! let stats = table.compute_stats();
//! assert_eq!(stats.used_slots, 1);
//! assert_eq!(stats.max_chain_length, 3);
//! # Ok::<(), chainstat::IndexError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dataset;
pub mod experiment;
pub mod index;
pub mod record;
pub mod stats;
pub mod status;

// Re-exports for convenience
pub use index::{ChainedHashTable, HashBucket, SearchOutcome};
pub use record::Record;
pub use stats::{QueryStats, TableStats};
pub use status::{IndexError, ProbeStatus};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{ChainstatConfig, ExperimentSettings};
    pub use crate::experiment::{run_experiment, Experiment, ExperimentError};
    pub use crate::index::{ChainedHashTable, SearchOutcome};
    pub use crate::record::Record;
    pub use crate::stats::{QueryStats, ReportFormat, RunReport, StatsReporter, TableStats};
    pub use crate::status::{IndexError, ProbeStatus};
}
