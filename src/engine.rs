use crate::cache::{normalize_query, QueryCache};
use crate::core::{CardRecord, PageProgress, SearchError, SearchResponse, SearchSource, SearchState};
use crate::paginator::ResultPaginator;
use crate::providers::CardProvider;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Search orchestrator: cache lookup, remote fallback, paginator reset.
///
/// Every `search` call is stamped with a sequence number. A fetch that
/// resolves after a newer search was issued still populates the cache but
/// leaves the paginator alone and reports [`SearchError::Superseded`].
pub struct SearchController {
    cache: QueryCache,
    provider: Arc<dyn CardProvider>,
    paginator: Mutex<ResultPaginator>,
    page_size: usize,
    latest_seq: AtomicU64,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight counter even if the search future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SearchController {
    pub fn new(cache: QueryCache, provider: Arc<dyn CardProvider>, page_size: usize) -> Self {
        Self {
            cache,
            provider,
            paginator: Mutex::new(ResultPaginator::new()),
            page_size: page_size.max(1),
            latest_seq: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    fn paginator(&self) -> MutexGuard<'_, ResultPaginator> {
        self.paginator.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `Searching` while at least one remote fetch is suspended
    pub fn state(&self) -> SearchState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SearchState::Searching
        } else {
            SearchState::Idle
        }
    }

    /// Search for cards
    pub async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let start = Instant::now();

        // An empty query still supersedes any fetch in flight
        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().is_empty() {
            tracing::debug!("Empty query, nothing to search");
            return Err(SearchError::EmptyQuery);
        }

        let key = normalize_query(query);

        // Check cache first
        if let Some(cached) = self.cache.get(&key) {
            return Ok(self.publish(key, cached, SearchSource::Cache, start));
        }

        // Fetch from provider with the raw query
        let fetched = {
            let _guard = InFlight::enter(&self.in_flight);
            tracing::debug!("Searching '{}' via {} (seq {})", key, self.provider.name(), seq);
            self.provider.search(query).await
        };

        let superseded = self.latest_seq.load(Ordering::SeqCst) != seq;

        let results = match fetched {
            Ok(results) if results.is_empty() => {
                tracing::info!("No cards found for '{}'", key);
                if superseded {
                    return Err(SearchError::Superseded(key));
                }
                return Err(SearchError::NoResults(key));
            }
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Provider {} failed for '{}': {}", self.provider.name(), key, e);
                if superseded {
                    return Err(SearchError::Superseded(key));
                }
                return Err(SearchError::FetchFailed { query: key, source: e });
            }
        };

        // Save to cache even when superseded; the fetch was good
        self.cache.put(&key, results.clone());

        if superseded {
            tracing::debug!("Discarding stale results for '{}' (seq {})", key, seq);
            return Err(SearchError::Superseded(key));
        }

        Ok(self.publish(key, results, SearchSource::Remote, start))
    }

    /// Reset the paginator with `results` and take the first page
    fn publish(
        &self,
        query: String,
        results: Vec<CardRecord>,
        source: SearchSource,
        start: Instant,
    ) -> SearchResponse {
        let (first_page, progress) = {
            let mut paginator = self.paginator();
            paginator.reset(results.clone());
            let page = paginator.next_page(self.page_size);
            (page, paginator.progress())
        };

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "✅ '{}' -> {} cards from {:?} ({:.1}ms)",
            query,
            results.len(),
            source,
            latency_ms
        );

        SearchResponse {
            query,
            results,
            first_page,
            progress,
            source,
            latency_ms,
        }
    }

    /// Next page using the configured page size
    pub fn next_page(&self) -> Vec<CardRecord> {
        self.next_page_sized(self.page_size)
    }

    pub fn next_page_sized(&self, page_size: usize) -> Vec<CardRecord> {
        self.paginator().next_page(page_size)
    }

    pub fn has_more(&self) -> bool {
        self.paginator().has_more()
    }

    pub fn total_count(&self) -> usize {
        self.paginator().total_count()
    }

    pub fn displayed_count(&self) -> usize {
        self.paginator().displayed_count()
    }

    pub fn progress(&self) -> PageProgress {
        self.paginator().progress()
    }

    /// Card at `index` in the current result set
    pub fn card(&self, index: usize) -> Option<CardRecord> {
        self.paginator().results().get(index).cloned()
    }
}
