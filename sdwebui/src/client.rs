//! Stable Diffusion web UI client.

use std::sync::Arc;
use std::time::Duration;

use super::{
    error::{Error, Result},
    http::HttpClient,
    image::ImageService,
    options::OptionsService,
};

/// Default web UI address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7860";

/// Stable Diffusion web UI client.
///
/// # Example
///
/// ```rust,no_run
/// use smarttile_sdwebui::{Client, Txt2ImgRequest};
///
/// # async fn run() -> smarttile_sdwebui::Result<()> {
/// let client = Client::new()?;
/// client.ping().await?;
/// let resp = client.images().txt2img(&Txt2ImgRequest::new("PBR, brick")).await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    http: Arc<HttpClient>,
}

impl Client {
    /// Creates a client for the default local address.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Checks that the web UI answers a plain GET on its base URL.
    pub async fn ping(&self) -> Result<()> {
        self.http.get_root().await
    }

    /// Returns the options service.
    pub fn options(&self) -> OptionsService {
        OptionsService::new(self.http.clone())
    }

    /// Returns the image service.
    pub fn images(&self) -> ImageService {
        ImageService::new(self.http.clone())
    }
}

/// Builder for creating a web UI client.
pub struct ClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Sets the web UI base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets a request timeout. Without one the transport default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("base_url must be non-empty".to_string()));
        }

        let http = HttpClient::new(base_url, self.timeout)?;
        Ok(Client {
            http: Arc::new(http),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
