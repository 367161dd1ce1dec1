//! Error types for texture generation runs.

use thiserror::Error;

use crate::backend::CompletionError;
use crate::preflight::ValidationOutcome;

/// Result type alias for texture generation.
pub type Result<T> = std::result::Result<T, TilesError>;

/// Error type for texture generation.
#[derive(Error, Debug)]
pub enum TilesError {
    /// A preflight check failed; nothing was generated.
    #[error("preflight failed: {0}")]
    Preflight(ValidationOutcome),

    /// The completion model failed.
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    /// The image service failed.
    #[error("image service failed: {0}")]
    Image(#[from] smarttile_sdwebui::Error),

    /// The returned image could not be decoded.
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// PNG encoding error.
    #[error("png encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    /// PNG decoding error.
    #[error("png decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    /// A PNG chunk stream that ends early or lacks image data.
    #[error("malformed png: {0}")]
    MalformedPng(&'static str),

    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TilesError {
    /// Returns the preflight outcome if this error is a rejected run.
    pub fn preflight_outcome(&self) -> Option<ValidationOutcome> {
        match self {
            TilesError::Preflight(outcome) => Some(*outcome),
            _ => None,
        }
    }
}
