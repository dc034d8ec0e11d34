//! High-resolution image download.
//!
//! Fetches the card's full-size image into memory. When that fails the
//! caller gets a [`DownloadOutcome::DirectLink`] with the URL and suggested
//! file name, so it can hand the download to something else (a browser, an
//! external tool) instead of failing outright.

use reqwest::Client;
use std::path::{Path, PathBuf};

use crate::config::GalleryConfig;
use crate::core::CardRecord;
use crate::error::{GalleryError, Result};

const DEFAULT_EXTENSION: &str = "jpg";

/// Image bytes fetched in memory
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub url: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DownloadedImage {
    /// Write into `dir` under the suggested file name
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;

        tracing::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// Bytes are in memory
    Fetched(DownloadedImage),
    /// Fetch failed; download by following the link directly
    DirectLink { url: String, file_name: String },
}

impl DownloadOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            DownloadOutcome::Fetched(image) => &image.file_name,
            DownloadOutcome::DirectLink { file_name, .. } => file_name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            DownloadOutcome::Fetched(image) => &image.url,
            DownloadOutcome::DirectLink { url, .. } => url,
        }
    }

    pub fn is_direct_link(&self) -> bool {
        matches!(self, DownloadOutcome::DirectLink { .. })
    }
}

/// Extension of the URL's last path segment, ignoring query and fragment
pub fn url_extension(url: &str) -> &str {
    let without_suffix = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = without_suffix.rsplit('/').next().unwrap_or(without_suffix);

    match last_segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => ext,
        _ => DEFAULT_EXTENSION,
    }
}

/// Suggested file name for a card's image, e.g. `Dark_Magician.jpg`
pub fn file_name_for(card: &CardRecord, url: &str) -> String {
    let stem = card.file_stem();
    let stem = if stem.is_empty() { card.id.to_string() } else { stem };
    format!("{}.{}", stem, url_extension(url))
}

pub struct ImageDownloader {
    client: Client,
}

impl ImageDownloader {
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch raw bytes from an image URL
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching image: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GalleryError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Download a card's high-quality image, falling back to a direct link.
    ///
    /// Errors only when the card has no image URL at all.
    pub async fn download(&self, card: &CardRecord) -> Result<DownloadOutcome> {
        let url = card.high_quality_url();
        if url.is_empty() {
            return Err(GalleryError::Other(format!("'{}' has no image", card.name)));
        }

        let file_name = file_name_for(card, url);

        match self.fetch_image(url).await {
            Ok(bytes) => Ok(DownloadOutcome::Fetched(DownloadedImage {
                url: url.to_string(),
                file_name,
                bytes,
            })),
            Err(e) => {
                tracing::warn!("Image fetch failed for '{}', using direct link: {}", card.name, e);
                Ok(DownloadOutcome::DirectLink {
                    url: url.to_string(),
                    file_name,
                })
            }
        }
    }
}
