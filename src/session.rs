use std::sync::Arc;

use crate::cache::{CacheStats, CacheSweeper, QueryCache};
use crate::config::GalleryConfig;
use crate::core::{CardRecord, PageProgress, SearchError, SearchResponse, SearchState};
use crate::download::{DownloadOutcome, ImageDownloader};
use crate::engine::SearchController;
use crate::error::{GalleryError, Result};
use crate::providers::{CardProvider, YgoProDeckProvider};

/// One gallery session: controller, cache sweeper and downloader.
///
/// Create one per UI instance and hand it to the event handlers by
/// reference. Sessions share nothing with each other.
pub struct GallerySession {
    config: GalleryConfig,
    controller: SearchController,
    downloader: ImageDownloader,
    sweeper: CacheSweeper,
}

impl GallerySession {
    /// Create a session backed by the YGOPRODeck API.
    /// Must be called inside a tokio runtime (the cache sweeper is spawned).
    pub async fn new(config: GalleryConfig) -> Result<Self> {
        let provider = Arc::new(YgoProDeckProvider::new(&config)?);
        Self::with_provider(config, provider).await
    }

    /// Create a session with a custom card provider
    pub async fn with_provider(
        config: GalleryConfig,
        provider: Arc<dyn CardProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let cache = QueryCache::new(config.cache_max_entries)
            .with_clear_on_overflow(config.clear_on_overflow);
        let sweeper = CacheSweeper::spawn(cache.clone(), config.sweep_interval);
        let controller = SearchController::new(cache, provider, config.page_size);
        let downloader = ImageDownloader::new(&config)?;

        tracing::info!("🃏 Gallery session ready ({})", config);

        Ok(Self {
            config,
            controller,
            downloader,
            sweeper,
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn state(&self) -> SearchState {
        self.controller.state()
    }

    /// Search for cards; the first page is in the response
    pub async fn search(&self, query: &str) -> std::result::Result<SearchResponse, SearchError> {
        self.controller.search(query).await
    }

    /// "Load more"
    pub fn next_page(&self) -> Vec<CardRecord> {
        self.controller.next_page()
    }

    pub fn has_more(&self) -> bool {
        self.controller.has_more()
    }

    pub fn total_count(&self) -> usize {
        self.controller.total_count()
    }

    pub fn displayed_count(&self) -> usize {
        self.controller.displayed_count()
    }

    pub fn progress(&self) -> PageProgress {
        self.controller.progress()
    }

    /// Download the HD image of the card at `index` in the current results
    pub async fn download(&self, index: usize) -> Result<DownloadOutcome> {
        let card = self.controller.card(index).ok_or_else(|| {
            GalleryError::Other(format!(
                "No card at position {} (have {})",
                index + 1,
                self.total_count()
            ))
        })?;
        self.downloader.download(&card).await
    }

    pub fn downloader(&self) -> &ImageDownloader {
        &self.downloader
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.controller.cache().stats()
    }

    /// Drop all cached queries now
    pub fn clear_cache(&self) -> usize {
        self.controller.cache().clear()
    }

    pub fn sweeper_running(&self) -> bool {
        self.sweeper.is_running()
    }
}
