//! Error types for the OpenAI API client.

use std::fmt;

use thiserror::Error;

/// Result type alias for OpenAI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for OpenAI API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by OpenAI.
    #[error("openai: {message} (status={http_status}, type={error_type}, code={code})")]
    Api {
        http_status: u16,
        error_type: String,
        code: String,
        message: String,
    },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API key cannot be sent as a Latin-1 header value.
    #[error("api key contains characters outside latin-1")]
    InvalidCredential,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Failure category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The key was rejected.
    Authentication,
    /// Too many requests or quota exhausted.
    RateLimit,
    /// Any other error reported by the API.
    Api,
    /// The API could not be reached.
    Connection,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Authentication => write!(f, "authentication"),
            ErrorKind::RateLimit => write!(f, "rate_limit"),
            ErrorKind::Api => write!(f, "api"),
            ErrorKind::Connection => write!(f, "connection"),
        }
    }
}

impl Error {
    /// Creates a new API error.
    pub fn api(http_status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            http_status,
            error_type: String::new(),
            code: String::new(),
            message: message.into(),
        }
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::Api { http_status: 429, .. })
    }

    /// Returns true if this is an invalid API key error.
    pub fn is_invalid_api_key(&self) -> bool {
        match self {
            Error::Api {
                http_status, code, ..
            } => *http_status == 401 || *http_status == 403 || code == "invalid_api_key",
            Error::InvalidCredential => true,
            _ => false,
        }
    }

    /// Returns true if the API could not be reached at all.
    pub fn is_connection(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { http_status, .. } if *http_status >= 500)
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        if self.is_invalid_api_key() {
            ErrorKind::Authentication
        } else if self.is_rate_limit() {
            ErrorKind::RateLimit
        } else if self.is_connection() {
            ErrorKind::Connection
        } else {
            ErrorKind::Api
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, code: &str) -> Error {
        Error::Api {
            http_status: status,
            error_type: "invalid_request_error".to_string(),
            code: code.to_string(),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_kind_authentication() {
        assert_eq!(api_error(401, "").kind(), ErrorKind::Authentication);
        assert_eq!(api_error(400, "invalid_api_key").kind(), ErrorKind::Authentication);
        assert_eq!(Error::InvalidCredential.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_kind_rate_limit() {
        assert!(api_error(429, "rate_limit_exceeded").is_rate_limit());
        assert_eq!(api_error(429, "insufficient_quota").kind(), ErrorKind::RateLimit);
    }

    #[test]
    fn test_kind_api() {
        assert_eq!(api_error(500, "").kind(), ErrorKind::Api);
        assert!(api_error(503, "").is_server_error());
        assert_eq!(api_error(404, "model_not_found").kind(), ErrorKind::Api);
        assert_eq!(Error::Other("x".into()).kind(), ErrorKind::Api);
    }

    #[test]
    fn test_display() {
        let e = api_error(401, "invalid_api_key");
        assert_eq!(
            e.to_string(),
            "openai: boom (status=401, type=invalid_request_error, code=invalid_api_key)"
        );
        assert_eq!(ErrorKind::RateLimit.to_string(), "rate_limit");
    }
}
