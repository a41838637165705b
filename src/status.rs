//! Status codes and errors for hash table operations
//!
//! This module defines the outcome status of a lookup and the errors the
//! table itself can raise. A miss is a status, never an error.

use std::fmt;

/// Status of a single lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStatus {
    /// The key was found in its chain
    Hit,
    /// The chain was exhausted without a match
    Miss,
}

impl ProbeStatus {
    /// Check if the lookup found the key
    #[inline]
    pub const fn is_hit(&self) -> bool {
        matches!(self, ProbeStatus::Hit)
    }

    /// Check if the lookup missed
    #[inline]
    pub const fn is_miss(&self) -> bool {
        matches!(self, ProbeStatus::Miss)
    }

    /// Get the status as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Hit => "HIT",
            ProbeStatus::Miss => "MISS",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for ProbeStatus {
    #[inline]
    fn from(found: bool) -> Self {
        if found {
            ProbeStatus::Hit
        } else {
            ProbeStatus::Miss
        }
    }
}

/// Errors raised by the hash table core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Table size is zero or cannot be addressed on this platform.
    #[error("invalid table size: {size} (must be positive)")]
    InvalidSize {
        /// Requested number of buckets.
        size: u64,
    },
}
