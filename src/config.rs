//! Gallery configuration with defaults matching the web gallery.
//!
//! Values come from a string map (`from_map`) or the process environment
//! (`from_env`, `CARD_GALLERY_*` variables). Every key is optional and falls
//! back to its default; a present but unparsable value is an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{GalleryError, Result};

/// Prefix for environment variables read by [`GalleryConfig::from_env`]
pub const ENV_PREFIX: &str = "CARD_GALLERY_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Card API root; `/cardinfo.php` is appended
    pub api_base_url: String,

    /// Cards per page ("load more" batch)
    pub page_size: usize,

    /// Entry count above which the sweep clears the whole cache
    pub cache_max_entries: usize,

    /// Interval of the background cache sweep
    pub sweep_interval: Duration,

    /// Clear the cache on the `put` that overflows it instead of waiting for the sweep
    pub clear_on_overflow: bool,

    /// Quiet window before a typed query is searched
    pub debounce: Duration,

    /// HTTP timeout for lookups and downloads
    pub request_timeout: Duration,

    pub user_agent: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://db.ygoprodeck.com/api/v7".to_string(),
            page_size: 12,
            cache_max_entries: 50,
            sweep_interval: Duration::from_secs(300),
            clear_on_overflow: false,
            debounce: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
            user_agent: format!("card-gallery/{}", crate::VERSION),
        }
    }
}

impl GalleryConfig {
    /// Build from a key/value map. Keys are lower-case without prefix:
    /// `api_base_url`, `page_size`, `cache_max_entries`, `sweep_interval_secs`,
    /// `clear_on_overflow`, `debounce_ms`, `request_timeout_secs`, `user_agent`.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            api_base_url: map
                .get("api_base_url")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            page_size: parse_key(map, "page_size")?.unwrap_or(defaults.page_size),
            cache_max_entries: parse_key(map, "cache_max_entries")?
                .unwrap_or(defaults.cache_max_entries),
            sweep_interval: parse_key(map, "sweep_interval_secs")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            clear_on_overflow: parse_key(map, "clear_on_overflow")?
                .unwrap_or(defaults.clear_on_overflow),
            debounce: parse_key(map, "debounce_ms")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            request_timeout: parse_key(map, "request_timeout_secs")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            user_agent: map.get("user_agent").cloned().unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }

    /// Build from `CARD_GALLERY_*` environment variables
    pub fn from_env() -> Result<Self> {
        let map = std::env::vars()
            .filter_map(|(k, v)| {
                k.strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_ascii_lowercase(), v))
            })
            .collect::<HashMap<_, _>>();
        Self::from_map(&map)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(config_error("page_size", "must be greater than 0"));
        }
        if self.cache_max_entries == 0 {
            return Err(config_error("cache_max_entries", "must be greater than 0"));
        }
        if self.sweep_interval.is_zero() {
            return Err(config_error("sweep_interval_secs", "must be greater than 0"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(config_error("api_base_url", "must be an http(s) URL"));
        }
        Ok(())
    }
}

fn config_error(key: &str, message: impl Into<String>) -> GalleryError {
    GalleryError::Config {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_key<T>(map: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    map.get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| config_error(key, format!("'{}': {}", raw, e)))
        })
        .transpose()
}

impl fmt::Display for GalleryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "api={}, page_size={}, cache_max={}, sweep={}s, debounce={}ms, timeout={}s",
            self.api_base_url,
            self.page_size,
            self.cache_max_entries,
            self.sweep_interval.as_secs(),
            self.debounce.as_millis(),
            self.request_timeout.as_secs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_default_values() {
        let config = GalleryConfig::default();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.cache_max_entries, 50);
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert!(!config.clear_on_overflow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_map_partial() {
        let config = GalleryConfig::from_map(&map(&[
            ("page_size", "24"),
            ("debounce_ms", "250"),
            ("api_base_url", "http://localhost:9000/api/"),
        ]))
        .unwrap();

        assert_eq!(config.page_size, 24);
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert_eq!(config.cache_max_entries, 50); // default
    }

    #[test]
    fn test_from_map_invalid_number() {
        let err = GalleryConfig::from_map(&map(&[("page_size", "twelve")])).unwrap_err();
        assert!(matches!(err, GalleryError::Config { ref key, .. } if key == "page_size"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(GalleryConfig::from_map(&map(&[("page_size", "0")])).is_err());
    }

    #[test]
    fn test_bad_url_rejected() {
        assert!(GalleryConfig::from_map(&map(&[("api_base_url", "ftp://nope")])).is_err());
    }

    #[test]
    fn test_from_env_strips_prefix() {
        std::env::set_var("CARD_GALLERY_PAGE_SIZE", "30");
        std::env::set_var("CARD_GALLERY_CLEAR_ON_OVERFLOW", "true");
        let config = GalleryConfig::from_env();
        std::env::remove_var("CARD_GALLERY_PAGE_SIZE");
        std::env::remove_var("CARD_GALLERY_CLEAR_ON_OVERFLOW");

        let config = config.unwrap();
        assert_eq!(config.page_size, 30);
        assert!(config.clear_on_overflow);
        assert_eq!(config.cache_max_entries, 50); // default
    }

    #[test]
    fn test_display() {
        let s = GalleryConfig::default().to_string();
        assert!(s.contains("page_size=12"));
        assert!(s.contains("sweep=300s"));
    }
}
