use thiserror::Error;

/// Main error type for the card gallery
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Transport-level failures (DNS, connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status that carries no usable body
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Body could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors (image download)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("Invalid configuration for '{key}': {message}")]
    Config { key: String, message: String },

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl GalleryError {
    /// True for failures caused by talking to the remote API
    /// (as opposed to local configuration or disk problems).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            GalleryError::Network(_)
                | GalleryError::HttpStatus { .. }
                | GalleryError::MalformedResponse(_)
                | GalleryError::Json(_)
        )
    }
}

impl From<String> for GalleryError {
    fn from(s: String) -> Self {
        GalleryError::Other(s)
    }
}

impl From<&str> for GalleryError {
    fn from(s: &str) -> Self {
        GalleryError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GalleryError>;
