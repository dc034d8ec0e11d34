pub mod memory;
pub mod sweeper;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use memory::QueryCache;
pub use sweeper::CacheSweeper;

/// Normalize query for consistent cache lookups
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Cache statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Sweeps run, whether or not they cleared anything
    pub sweeps: u64,
    /// Wholesale clears (sweep or overflow)
    pub clears: u64,
    pub last_cleared: Option<DateTime<Utc>>,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups > 0 {
            self.hits as f64 / lookups as f64
        } else {
            0.0
        }
    }
}
