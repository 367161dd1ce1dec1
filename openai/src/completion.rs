//! Text completion service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    error::{Error, Result},
    http::HttpClient,
};

/// Text completion service.
pub struct CompletionService {
    http: Arc<HttpClient>,
    model: String,
}

impl CompletionService {
    pub(crate) fn new(http: Arc<HttpClient>, model: String) -> Self {
        Self { http, model }
    }

    /// Creates a completion.
    ///
    /// An empty `model` in the request is replaced by the client's model.
    pub async fn create(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if request.model.is_empty() {
            let request = CompletionRequest {
                model: self.model.clone(),
                ..request.clone()
            };
            return self.http.post("/completions", &request).await;
        }
        self.http.post("/completions", request).await
    }

    /// Completes `prompt` and returns the text of the first choice.
    pub async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
            ..Default::default()
        };

        let response = self.create(&request).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| Error::Other("completion returned no choices".to_string()))
    }
}

// ==================== Request/Response Types ====================

/// Request for a text completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model name.
    pub model: String,

    /// Prompt text.
    pub prompt: String,

    /// Sampling temperature (0-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Number of completions to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    /// Sequences where generation stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// Response from a text completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Returns the text of the first choice.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// A completion choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub index: i32,
    pub finish_reason: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: i32,
    #[serde(default)]
    pub completion_tokens: i32,
    pub total_tokens: i32,
}
