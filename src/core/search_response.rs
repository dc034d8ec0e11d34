use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::CardRecord;
use crate::error::GalleryError;

/// Where a result set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    /// Served from the in-memory query cache
    Cache,
    /// Fetched from the remote card API
    Remote,
}

/// Controller lifecycle as seen by the UI.
///
/// `Searching` is only ever observed while a remote fetch is suspended;
/// cache hits and guard failures go straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchState {
    #[default]
    Idle,
    Searching,
}

/// Display progress of the current result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageProgress {
    pub displayed: usize,
    pub total: usize,
    pub has_more: bool,
}

impl fmt::Display for PageProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} cards", self.displayed, self.total)
    }
}

/// Successful search with the first page already taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Normalized query used as the cache key
    pub query: String,

    /// Full result set, API order
    pub results: Vec<CardRecord>,

    /// First page, already consumed from the paginator
    pub first_page: Vec<CardRecord>,

    /// Progress after the first page
    pub progress: PageProgress,

    pub source: SearchSource,

    /// Search latency in milliseconds
    pub latency_ms: f64,
}

impl SearchResponse {
    pub fn from_cache(&self) -> bool {
        self.source == SearchSource::Cache
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        format!(
            "'{}' -> {} cards ({:?}, {:.1}ms) - {}",
            self.query,
            self.results.len(),
            self.source,
            self.latency_ms,
            self.progress
        )
    }
}

/// Non-success outcomes of a search.
///
/// `EmptyQuery` and `NoResults` are guidance states, not failures; all four
/// are returned to the caller, never panicked past the controller.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("empty query")]
    EmptyQuery,

    #[error("no cards found for '{0}'")]
    NoResults(String),

    #[error("fetch failed for '{query}': {source}")]
    FetchFailed {
        query: String,
        #[source]
        source: GalleryError,
    },

    /// A newer search was issued while this one was in flight
    #[error("search for '{0}' was superseded by a newer query")]
    Superseded(String),
}

impl SearchError {
    /// Message suitable for showing in place of the gallery
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::EmptyQuery => "Type a card name above.",
            SearchError::NoResults(_) => "No cards found.",
            SearchError::FetchFailed { .. } => "Error loading cards. Please try again.",
            SearchError::Superseded(_) => "",
        }
    }

    /// Whether the UI should render this as an error rather than a hint
    pub fn is_failure(&self) -> bool {
        matches!(self, SearchError::FetchFailed { .. })
    }
}
