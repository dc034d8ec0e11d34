use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::GalleryConfig;
use crate::core::CardRecord;
use crate::error::{GalleryError, Result};
use crate::providers::CardProvider;

/// YGOPRODeck card database provider (`cardinfo.php?fname=`)
pub struct YgoProDeckProvider {
    client: Client,
    base_url: String,
}

/// Body of `cardinfo.php`: either `data` or, for no match, `error`
#[derive(Debug, Deserialize)]
struct CardInfoResponse {
    #[serde(default)]
    data: Option<Vec<CardRecord>>,
    #[serde(default)]
    error: Option<String>,
}

impl YgoProDeckProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://db.ygoprodeck.com/api/v7";

    /// Create provider from gallery configuration
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/cardinfo.php?fname={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Decode a `cardinfo.php` body.
    ///
    /// The API signals "no match" with HTTP 400 and `{"error": ...}`, so a
    /// client error carrying an `error` field is an empty result, not a failure.
    fn decode(status: reqwest::StatusCode, url: &str, body: &str) -> Result<Vec<CardRecord>> {
        let parsed: std::result::Result<CardInfoResponse, _> = serde_json::from_str(body);

        match parsed {
            Ok(CardInfoResponse { data: Some(cards), .. }) if status.is_success() => Ok(cards),
            Ok(CardInfoResponse { data: None, error }) if status.is_success() || status.is_client_error() => {
                if let Some(message) = error {
                    tracing::debug!("No match reported by API: {}", message);
                }
                Ok(Vec::new())
            }
            Ok(_) => Err(GalleryError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(_) if !status.is_success() => Err(GalleryError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(e) => Err(GalleryError::MalformedResponse(format!(
                "cardinfo.php: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl CardProvider for YgoProDeckProvider {
    async fn search(&self, query: &str) -> Result<Vec<CardRecord>> {
        let url = self.search_url(query);
        tracing::info!("Fetching cards from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let cards = Self::decode(status, &url, &body)?;
        tracing::debug!("Provider {} returned {} cards", self.name(), cards.len());
        Ok(cards)
    }

    fn name(&self) -> &str {
        "ygoprodeck"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/checkDBVer.php", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Provider {} unreachable: {}", self.name(), e);
                false
            }
        }
    }
}
