//! # Card Gallery
//!
//! Trading-card search engine behind a paginated image gallery:
//! - Remote card lookup (YGOPRODeck) behind the `CardProvider` trait
//! - Bounded in-memory query cache, cleared wholesale by a periodic sweep
//! - Result paginator handing out "load more" batches
//! - Stale-response protection for overlapping searches
//! - HD image download with a direct-link fallback
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use card_gallery::{GalleryConfig, GallerySession};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = GallerySession::new(GalleryConfig::default()).await?;
//!
//!     match session.search("Blue-Eyes").await {
//!         Ok(response) => {
//!             for card in &response.first_page {
//!                 println!("{} - {}", card.name, card.small_image_url());
//!             }
//!             println!("{}", response.progress);
//!
//!             while session.has_more() {
//!                 let page = session.next_page();
//!                 println!("+{} ({})", page.len(), session.progress());
//!             }
//!         }
//!         Err(e) => println!("{}", e.user_message()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod debounce;
pub mod download;
pub mod engine;
pub mod error;
pub mod paginator;
pub mod providers;
pub mod session;

// Re-export primary types
pub use crate::cache::{CacheStats, QueryCache};
pub use config::GalleryConfig;
pub use crate::core::{CardRecord, PageProgress, SearchError, SearchResponse, SearchSource, SearchState};
pub use engine::SearchController;
pub use error::{GalleryError, Result};
pub use paginator::ResultPaginator;
pub use session::GallerySession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
