//! Bucket chains
//!
//! Each bucket owns the records that hashed to its index, in insertion order.

use crate::record::Record;

/// A single bucket: an ordered chain of records.
///
/// New records are always appended at the tail and lookups scan from the
/// head, so the earliest inserted record with a given id shadows later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashBucket {
    chain: Vec<Record>,
}

impl HashBucket {
    /// Create an empty bucket
    pub const fn new() -> Self {
        Self { chain: Vec::new() }
    }

    /// Append a record at the tail of the chain
    #[inline]
    pub fn push(&mut self, record: Record) {
        self.chain.push(record);
    }

    /// Scan the chain for `id`.
    ///
    /// Returns the first match and the probe count. The count starts at 1 and
    /// grows by one per node visited before the match, so a miss costs the
    /// chain length plus one and an empty bucket costs one probe.
    pub fn find(&self, id: u64) -> (Option<&Record>, u64) {
        for (position, record) in self.chain.iter().enumerate() {
            if record.id() == id {
                return (Some(record), position as u64 + 1);
            }
        }
        (None, self.chain.len() as u64 + 1)
    }

    /// Number of records in the chain
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Check if the chain holds no records
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Iterate records head to tail
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.chain.iter()
    }
}

impl<'a> IntoIterator for &'a HashBucket {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
