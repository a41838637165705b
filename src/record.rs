//! Records stored in the hash table.
//!
//! A record is keyed by an unsigned 64-bit id and carries two free-form
//! string attributes. Records are immutable once built; after insertion the
//! owning bucket chain is the only holder.

use serde::Serialize;

/// A keyed record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    id: u64,
    name: String,
    tags: String,
}

impl Record {
    /// Create a new record.
    pub fn new(id: u64, name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tags: tags.into(),
        }
    }

    /// Key used for hashing and lookups.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Primary display attribute.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Secondary attribute (e.g. position codes).
    #[inline]
    pub fn tags(&self) -> &str {
        &self.tags
    }
}
