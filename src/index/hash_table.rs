//! Chained hash table implementation
//!
//! A fixed array of `HashBucket`s indexed by `id mod size`. The table never
//! resizes and never removes records.

use std::collections::BTreeMap;

use crate::index::{HashBucket, IndexConfig, KeyHash, SearchOutcome};
use crate::record::Record;
use crate::stats::TableStats;
use crate::status::IndexError;

/// Separate-chaining hash table - a sized array of bucket chains
#[derive(Debug, Clone)]
pub struct ChainedHashTable {
    /// Bucket array, fixed at construction
    buckets: Box<[HashBucket]>,
    /// Number of buckets
    size: u64,
    /// Records inserted so far
    len: u64,
}

impl ChainedHashTable {
    /// Create a table with `size` empty buckets.
    ///
    /// Fails with [`IndexError::InvalidSize`] when `size` is zero or does not
    /// fit in the address space.
    pub fn new(size: u64) -> Result<Self, IndexError> {
        if size == 0 {
            return Err(IndexError::InvalidSize { size });
        }
        let slots = usize::try_from(size).map_err(|_| IndexError::InvalidSize { size })?;
        let buckets = vec![HashBucket::new(); slots].into_boxed_slice();

        Ok(Self {
            buckets,
            size,
            len: 0,
        })
    }

    /// Create a table from an index configuration
    pub fn with_config(config: &IndexConfig) -> Result<Self, IndexError> {
        Self::new(config.table_size)
    }

    /// Bucket index for `id`, always in `[0, size)`
    #[inline]
    pub fn hash(&self, id: u64) -> usize {
        KeyHash::new(id).bucket_index(self.size)
    }

    /// Append `record` to the tail of its bucket chain.
    ///
    /// Duplicate ids are kept as separate entries.
    pub fn insert(&mut self, record: Record) {
        let index = self.hash(record.id());
        self.buckets[index].push(record);
        self.len += 1;
    }

    /// Insert every record in iteration order
    pub fn insert_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            self.insert(record);
        }
    }

    /// Look up `id`, scanning its chain in insertion order.
    ///
    /// The probe count includes the matching node. A miss reports the chain
    /// length plus one, so an empty bucket costs one probe.
    pub fn search(&self, id: u64) -> SearchOutcome<'_> {
        let (record, probes) = self.buckets[self.hash(id)].find(id);
        SearchOutcome { id, record, probes }
    }

    /// Compute occupancy and chain-length statistics in one pass.
    pub fn compute_stats(&self) -> TableStats {
        let mut used_slots = 0u64;
        let mut total_records = 0u64;
        let mut min_chain = u64::MAX;
        let mut max_chain = 0u64;

        for length in self.chain_lengths() {
            if length == 0 {
                continue;
            }
            let length = length as u64;
            used_slots += 1;
            total_records += length;
            min_chain = min_chain.min(length);
            max_chain = max_chain.max(length);
        }

        TableStats::from_counts(self.size, used_slots, total_records, min_chain, max_chain)
    }

    /// Number of buckets
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of records inserted
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Check if no record has been inserted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the bucket at a specific index
    ///
    /// # Panics
    /// Panics if `index >= size`.
    #[inline]
    pub fn bucket_at(&self, index: usize) -> &HashBucket {
        &self.buckets[index]
    }

    /// Iterate buckets in index order
    pub fn buckets(&self) -> std::slice::Iter<'_, HashBucket> {
        self.buckets.iter()
    }

    /// Chain length of every bucket, in index order
    pub fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(HashBucket::len)
    }

    /// Number of buckets for each chain length, empty buckets included
    pub fn chain_length_histogram(&self) -> BTreeMap<usize, u64> {
        let mut histogram = BTreeMap::new();
        for length in self.chain_lengths() {
            *histogram.entry(length).or_insert(0) += 1;
        }
        histogram
    }
}

impl Extend<Record> for ChainedHashTable {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}
