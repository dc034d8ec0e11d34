use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::{normalize_query, CacheStats};
use crate::core::CardRecord;

/// In-memory query cache, bounded by entry count.
///
/// Overflow is handled by clearing every entry rather than evicting
/// individual ones. By default the clear happens on the next
/// [`maybe_evict_all`](Self::maybe_evict_all) sweep, so the count may sit
/// above `max_entries` between sweeps.
///
/// Cloning yields another handle to the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
    max_entries: usize,
    clear_on_overflow: bool,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Vec<CardRecord>>,
    hits: u64,
    misses: u64,
    sweeps: u64,
    clears: u64,
    last_cleared: Option<DateTime<Utc>>,
}

impl Inner {
    fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.clears += 1;
        self.last_cleared = Some(Utc::now());
        removed
    }
}

impl QueryCache {
    pub const DEFAULT_MAX_ENTRIES: usize = 50;

    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            max_entries,
            clear_on_overflow: false,
        }
    }

    /// Clear on the overflowing `put` instead of waiting for the sweep
    pub fn with_clear_on_overflow(mut self, enabled: bool) -> Self {
        self.clear_on_overflow = enabled;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are plain data; a panic mid-update cannot break them.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Get cached results by query string
    pub fn get(&self, query: &str) -> Option<Vec<CardRecord>> {
        let key = normalize_query(query);
        let mut inner = self.lock();

        match inner.entries.get(&key).cloned() {
            Some(results) => {
                inner.hits += 1;
                tracing::debug!("Cache hit for '{}' ({} cards)", key, results.len());
                Some(results)
            }
            None => {
                inner.misses += 1;
                tracing::debug!("Cache miss for '{}'", key);
                None
            }
        }
    }

    /// Store results under the normalized query, replacing any previous entry
    pub fn put(&self, query: &str, results: Vec<CardRecord>) {
        let key = normalize_query(query);
        let mut inner = self.lock();
        inner.entries.insert(key, results);

        if self.clear_on_overflow && inner.entries.len() > self.max_entries {
            let removed = inner.clear_all();
            tracing::info!(
                "Query cache overflowed {} entries, cleared {}",
                self.max_entries,
                removed
            );
        }
    }

    /// Sweep: clear everything if the entry count is above the threshold.
    /// Returns the number of entries removed.
    pub fn maybe_evict_all(&self) -> usize {
        let mut inner = self.lock();
        inner.sweeps += 1;

        if inner.entries.len() > self.max_entries {
            let removed = inner.clear_all();
            tracing::info!("Cache sweep cleared {} entries", removed);
            removed
        } else {
            tracing::debug!(
                "Cache sweep: {}/{} entries, nothing to do",
                inner.entries.len(),
                self.max_entries
            );
            0
        }
    }

    pub fn contains(&self, query: &str) -> bool {
        self.lock().entries.contains_key(&normalize_query(query))
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry regardless of size
    pub fn clear(&self) -> usize {
        self.lock().clear_all()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            total_entries: inner.entries.len(),
            max_entries: self.max_entries,
            hits: inner.hits,
            misses: inner.misses,
            sweeps: inner.sweeps,
            clears: inner.clears,
            last_cleared: inner.last_cleared,
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTRIES)
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("max_entries", &self.max_entries)
            .field("clear_on_overflow", &self.clear_on_overflow)
            .finish()
    }
}
