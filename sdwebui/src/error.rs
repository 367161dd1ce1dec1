//! Error types for the web UI client.

use thiserror::Error;

/// Result type alias for web UI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for web UI operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success status returned by the web UI.
    #[error("sdwebui: {message} (status={http_status})")]
    Api { http_status: u16, message: String },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(http_status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            http_status,
            message: message.into(),
        }
    }

    /// Returns true if the web UI could not be reached at all.
    pub fn is_connection(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
