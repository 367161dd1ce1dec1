//! Collaborator traits and their SDK implementations.
//!
//! The pipeline talks to a [`TextCompleter`] for material names and to an
//! [`ImageBackend`] for textures. The credential and service address are
//! bound when the implementation is constructed.

use async_trait::async_trait;
use thiserror::Error;

use smarttile_openai::ErrorKind;
use smarttile_sdwebui::{decode_image, PngInfoRequest, Txt2ImgRequest};

use crate::config::GenerationParams;

/// A failed completion call, classified by category.
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct CompletionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CompletionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<smarttile_openai::Error> for CompletionError {
    fn from(e: smarttile_openai::Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Text-completion collaborator.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    /// Completes `prompt` and returns the raw generated text.
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, CompletionError>;
}

/// Image-generation collaborator.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Checks that the service answers at its base address.
    async fn ping(&self) -> Result<(), smarttile_sdwebui::Error>;

    /// Selects the model checkpoint for subsequent generations.
    async fn set_checkpoint(&self, checkpoint: &str) -> Result<(), smarttile_sdwebui::Error>;

    /// Generates images and returns them base64-encoded.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, smarttile_sdwebui::Error>;

    /// Returns the generation parameters text for a base64-encoded image.
    async fn describe_image(&self, image: &str) -> Result<String, smarttile_sdwebui::Error>;

    /// Decodes a base64 image returned by [`ImageBackend::generate`].
    fn decode(&self, image: &str) -> Result<Vec<u8>, smarttile_sdwebui::Error> {
        decode_image(image)
    }
}

#[async_trait]
impl TextCompleter for smarttile_openai::Client {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, CompletionError> {
        self.completions()
            .complete(prompt, temperature, max_tokens)
            .await
            .map_err(CompletionError::from)
    }
}

#[async_trait]
impl ImageBackend for smarttile_sdwebui::Client {
    async fn ping(&self) -> Result<(), smarttile_sdwebui::Error> {
        smarttile_sdwebui::Client::ping(self).await
    }

    async fn set_checkpoint(&self, checkpoint: &str) -> Result<(), smarttile_sdwebui::Error> {
        self.options().set_checkpoint(checkpoint).await
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, smarttile_sdwebui::Error> {
        let request = Txt2ImgRequest {
            prompt: prompt.to_string(),
            negative_prompt: String::new(),
            seed: params.seed,
            batch_size: params.batch_size,
            n_iter: params.n_iter,
            steps: params.steps,
            cfg_scale: params.cfg_scale,
            width: params.width,
            height: params.height,
            tiling: params.tiling,
        };
        let response = self.images().txt2img(&request).await?;
        Ok(response.images)
    }

    async fn describe_image(&self, image: &str) -> Result<String, smarttile_sdwebui::Error> {
        let response = self.images().png_info(&PngInfoRequest::from_base64(image)).await?;
        Ok(response.info)
    }
}
