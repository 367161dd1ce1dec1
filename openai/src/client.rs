//! OpenAI API client.

use std::sync::Arc;
use std::time::Duration;

use super::{
    completion::CompletionService,
    error::{Error, Result},
    http::HttpClient,
};

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API client.
///
/// # Example
///
/// ```rust,no_run
/// use smarttile_openai::{Client, CompletionRequest};
///
/// # async fn run() -> smarttile_openai::Result<()> {
/// let client = Client::new("sk-...")?;
/// let text = client.completions().complete("Name a material", 0.6, 150).await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone)]
struct ClientConfig {
    api_key: String,
    base_url: String,
    model: String,
}

impl Client {
    /// Creates a new OpenAI API client with the default base URL and model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the completion model used by [`CompletionService::complete`].
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Returns the text completion service.
    pub fn completions(&self) -> CompletionService {
        CompletionService::new(self.http.clone(), self.config.model.clone())
    }

    /// Returns a reference to the internal HTTP client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}

/// Builder for creating an OpenAI API client.
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: super::models::DEFAULT_COMPLETION_MODEL.to_string(),
            timeout: None,
        }
    }

    /// Sets a custom base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the completion model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets a request timeout. Without one the transport default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// The credential is not checked here; a malformed key surfaces on the
    /// first request so callers can classify it.
    pub fn build(self) -> Result<Client> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url must be non-empty".to_string()));
        }
        if self.model.is_empty() {
            return Err(Error::Config("model must be non-empty".to_string()));
        }

        let base_url = self.base_url.trim_end_matches('/').to_string();
        let http = HttpClient::new(base_url.clone(), self.api_key.clone(), self.timeout)?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                api_key: self.api_key,
                base_url,
                model: self.model,
            },
        })
    }
}
