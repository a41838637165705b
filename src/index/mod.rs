//! Separate-chaining hash index
//!
//! This module provides the bucket chains, the fixed-size table that owns
//! them, and the per-lookup outcome type consumed by the statistics layer.

mod hash_bucket;
mod hash_table;

pub use hash_bucket::HashBucket;
pub use hash_table::ChainedHashTable;

use crate::record::Record;
use crate::status::ProbeStatus;

/// Key hash type for index operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyHash {
    hash: u64,
}

impl KeyHash {
    /// Create a new key hash
    #[inline]
    pub const fn new(hash: u64) -> Self {
        Self { hash }
    }

    /// Get the full hash value
    #[inline]
    pub const fn hash(&self) -> u64 {
        self.hash
    }

    /// Get the bucket index for a given table size (`hash mod size`)
    ///
    /// `size` must be non-zero; the result is always in `[0, size)`.
    #[inline]
    pub const fn bucket_index(&self, size: u64) -> usize {
        (self.hash % size) as usize
    }
}

impl From<u64> for KeyHash {
    #[inline]
    fn from(hash: u64) -> Self {
        Self::new(hash)
    }
}

/// Configuration for the hash index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Number of buckets (must be positive)
    pub table_size: u64,
}

impl IndexConfig {
    /// Create a new index configuration
    pub fn new(table_size: u64) -> Self {
        Self { table_size }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { table_size: 1000 }
    }
}

/// Result of a single lookup.
///
/// Borrows the matching record from its chain; the table keeps ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome<'a> {
    /// Key that was looked up
    pub id: u64,
    /// First record in insertion order with a matching id
    pub record: Option<&'a Record>,
    /// Chain nodes visited, never less than 1
    pub probes: u64,
}

impl<'a> SearchOutcome<'a> {
    /// Check if the lookup found a record
    #[inline]
    pub fn found(&self) -> bool {
        self.record.is_some()
    }

    /// Hit or miss
    #[inline]
    pub fn status(&self) -> ProbeStatus {
        ProbeStatus::from(self.found())
    }
}
