use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::cache::QueryCache;

/// Background task that periodically calls [`QueryCache::maybe_evict_all`].
///
/// Runs independently of searches; the first sweep happens one full
/// interval after spawning. The task is aborted when the handle is dropped.
pub struct CacheSweeper {
    handle: JoinHandle<()>,
    interval: Duration,
}

impl CacheSweeper {
    /// Spawn on the current tokio runtime
    pub fn spawn(cache: QueryCache, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let removed = cache.maybe_evict_all();
                if removed > 0 {
                    tracing::info!("🧹 Periodic sweep removed {} cached queries", removed);
                }
            }
        });

        tracing::debug!("Cache sweeper started ({}s interval)", interval.as_secs());
        Self { handle, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop sweeping
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
