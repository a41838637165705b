//! Query statistics collector
//!
//! Accumulates lookup outcomes one at a time and produces `QueryStats`
//! snapshots.

use crate::index::SearchOutcome;
use crate::stats::metrics::{ratio, QueryStats};

/// Incremental accumulator for lookup outcomes.
///
/// Hit probe counts are retained so the standard deviation can be taken
/// around the exact hit mean.
#[derive(Debug, Clone, Default)]
pub struct QueryStatsCollector {
    hit_probes: Vec<u64>,
    hit_probe_total: u64,
    misses: u64,
    miss_probe_total: u64,
    min_hit_probes: Option<u64>,
    max_hit_probes: u64,
}

impl QueryStatsCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one lookup
    pub fn record(&mut self, outcome: &SearchOutcome<'_>) {
        self.record_probes(outcome.found(), outcome.probes);
    }

    /// Record a raw hit/miss with its probe count
    pub fn record_probes(&mut self, found: bool, probes: u64) {
        if found {
            self.hit_probes.push(probes);
            self.hit_probe_total += probes;
            self.min_hit_probes = Some(self.min_hit_probes.map_or(probes, |m| m.min(probes)));
            self.max_hit_probes = self.max_hit_probes.max(probes);
        } else {
            self.misses += 1;
            self.miss_probe_total += probes;
        }
    }

    /// Queries recorded so far
    pub fn total_queries(&self) -> u64 {
        self.hit_probes.len() as u64 + self.misses
    }

    /// Build a snapshot of the current statistics
    pub fn snapshot(&self) -> QueryStats {
        let total_hits = self.hit_probes.len() as u64;
        let total_queries = self.total_queries();
        let avg_probes = ratio(self.hit_probe_total, total_hits);

        let std_dev_probes = (total_hits > 0).then(|| {
            let variance = self
                .hit_probes
                .iter()
                .map(|&p| {
                    let delta = p as f64 - avg_probes;
                    delta * delta
                })
                .sum::<f64>()
                / total_hits as f64;
            variance.sqrt()
        });

        QueryStats {
            total_queries,
            total_hits,
            total_misses: self.misses,
            min_probes: self.min_hit_probes.unwrap_or(0),
            max_probes: self.max_hit_probes,
            avg_probes,
            std_dev_probes,
            avg_probes_all_queries: ratio(self.hit_probe_total, total_queries),
            avg_miss_probes: ratio(self.miss_probe_total, self.misses),
        }
    }

    /// Clear all recorded outcomes
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
