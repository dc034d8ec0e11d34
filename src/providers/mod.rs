pub mod ygoprodeck;

use async_trait::async_trait;
use crate::core::CardRecord;
use crate::error::Result;

pub use ygoprodeck::YgoProDeckProvider;

/// Trait for remote card-lookup backends.
///
/// The three failure modes are kept apart: transport problems are
/// `GalleryError::Network`/`HttpStatus`, an undecodable body is
/// `GalleryError::MalformedResponse`, and "no match" is `Ok(vec![])`.
#[async_trait]
pub trait CardProvider: Send + Sync {
    /// Search cards by (partial) name, preserving API order
    async fn search(&self, query: &str) -> Result<Vec<CardRecord>>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;
}
