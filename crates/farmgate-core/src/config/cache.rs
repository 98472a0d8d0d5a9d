//! Validation cache configuration.

use serde::{Deserialize, Serialize};

/// In-memory validation cache configuration.
///
/// Entry TTLs are decided per write by the caller (positive and negative
/// validation results carry different lifetimes), so only capacity is
/// configured here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_max_capacity() -> u64 {
    10000
}
