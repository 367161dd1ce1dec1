//! HTTP client implementation for the web UI API.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT},
    Client as ReqwestClient, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::error::{Error, Result};

/// HTTP client for the web UI API.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET on the base URL and checks the status.
    pub async fn get_root(&self) -> Result<()> {
        tracing::debug!(url = %self.base_url, "sdwebui ping");

        let response = self
            .client
            .get(&self.base_url)
            .headers(default_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(parse_error(&body, status.as_u16()));
        }
        Ok(())
    }

    /// Posts a JSON body and decodes the JSON response.
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(%url, "sdwebui request");

        let response = self
            .client
            .post(&url)
            .headers(default_headers())
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Posts a JSON body and ignores the response body.
    pub async fn post_discard<T>(&self, path: &str, body: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(%url, "sdwebui request");

        let response = self
            .client
            .post(&url)
            .headers(default_headers())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(parse_error(&body, status.as_u16()));
        }
        Ok(())
    }

    /// Handles the API response.
    async fn handle_response<R>(&self, response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(parse_error(&body, status.as_u16()));
        }

        serde_json::from_slice(&body).map_err(Error::from)
    }
}

/// Returns default headers for API requests.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static("smarttile-sdwebui-rust/1.0"));
    headers
}

/// Error body returned by the web UI.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<String>,
}

/// Parses an error response body.
pub(crate) fn parse_error(body: &[u8], http_status: u16) -> Error {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        let detail = match parsed.detail {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        let message = [parsed.error, detail, parsed.errors]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(": ");
        if !message.is_empty() {
            return Error::api(http_status, message);
        }
    }

    Error::api(http_status, String::from_utf8_lossy(body).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_detail() {
        match parse_error(br#"{"detail":"Not Found"}"#, 404) {
            Error::Api {
                http_status,
                message,
            } => {
                assert_eq!(http_status, 404);
                assert_eq!(message, "Not Found");
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_parse_error_runtime() {
        let body = br#"{"error":"RuntimeError","detail":"","body":"","errors":"CUDA out of memory"}"#;
        let err = parse_error(body, 500);
        assert_eq!(err.to_string(), "sdwebui: RuntimeError: CUDA out of memory (status=500)");
    }

    #[test]
    fn test_parse_error_plain() {
        let err = parse_error(b"Internal Server Error", 500);
        assert_eq!(err.to_string(), "sdwebui: Internal Server Error (status=500)");
    }
}
