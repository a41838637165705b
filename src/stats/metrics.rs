//! Metric definitions
//!
//! Aggregates derived from table state (`TableStats`) and from a sequence of
//! lookups (`QueryStats`).

use serde::Serialize;

use crate::index::SearchOutcome;
use crate::stats::collector::QueryStatsCollector;

/// Occupancy and chain-length statistics of a populated table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableStats {
    /// Number of buckets (M)
    pub table_size: u64,
    /// Buckets holding at least one record
    pub used_slots: u64,
    /// Buckets holding no record
    pub empty_slots: u64,
    /// `used_slots / table_size`
    pub occupancy_rate: f64,
    /// Shortest non-empty chain (0 when every bucket is empty)
    pub min_chain_length: u64,
    /// Longest chain
    pub max_chain_length: u64,
    /// Records per used bucket (0 when every bucket is empty)
    pub avg_chain_length: f64,
    /// Records stored across all chains
    pub total_records: u64,
    /// Records per bucket, counting empty buckets
    pub load_factor: f64,
}

impl TableStats {
    /// Build from raw traversal counters.
    ///
    /// `min_chain` may be any sentinel when `used_slots` is zero.
    pub fn from_counts(
        table_size: u64,
        used_slots: u64,
        total_records: u64,
        min_chain: u64,
        max_chain: u64,
    ) -> Self {
        debug_assert!(table_size > 0);
        debug_assert!(used_slots <= table_size);

        let (min_chain_length, avg_chain_length) = if used_slots == 0 {
            (0, 0.0)
        } else {
            (min_chain, total_records as f64 / used_slots as f64)
        };

        Self {
            table_size,
            used_slots,
            empty_slots: table_size - used_slots,
            occupancy_rate: ratio(used_slots, table_size),
            min_chain_length,
            max_chain_length: max_chain,
            avg_chain_length,
            total_records,
            load_factor: ratio(total_records, table_size),
        }
    }
}

/// Lookup-cost statistics over a sequence of queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryStats {
    /// Queries executed
    pub total_queries: u64,
    /// Queries that found a record
    pub total_hits: u64,
    /// Queries that found nothing
    pub total_misses: u64,
    /// Fewest probes over hits (0 without hits)
    pub min_probes: u64,
    /// Most probes over hits (0 without hits)
    pub max_probes: u64,
    /// Mean probes over hits (0 without hits)
    pub avg_probes: f64,
    /// Population standard deviation over hits, `None` without hits
    pub std_dev_probes: Option<f64>,
    /// Hit probes divided by all queries (0 without queries)
    pub avg_probes_all_queries: f64,
    /// Mean probes over misses (0 without misses)
    pub avg_miss_probes: f64,
}

impl QueryStats {
    /// Compute statistics over `outcomes` in one pass
    pub fn from_outcomes<'r, 'a: 'r, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'r SearchOutcome<'a>>,
    {
        let mut collector = QueryStatsCollector::new();
        for outcome in outcomes {
            collector.record(outcome);
        }
        collector.snapshot()
    }

    /// Fraction of queries that hit (0 without queries)
    pub fn hit_rate(&self) -> f64 {
        ratio(self.total_hits, self.total_queries)
    }
}

impl Default for QueryStats {
    fn default() -> Self {
        QueryStatsCollector::new().snapshot()
    }
}

pub(crate) fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
