//! Texture synthesis: one material name in, PNG file(s) out.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::backend::ImageBackend;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::metadata::{embed_text_chunk, PARAMETERS_KEY};
use crate::names::MaterialName;

/// File name of the texture at `index`.
pub fn texture_file_name(index: usize) -> String {
    format!("Texture{}.png", index)
}

/// An image written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct TextureArtifact {
    pub index: usize,
    pub path: PathBuf,
    /// Encoded PNG as written.
    #[serde(skip)]
    pub image_bytes: Vec<u8>,
    /// Generation parameters embedded under [`PARAMETERS_KEY`].
    pub metadata_text: String,
}

/// Renders textures through an [`ImageBackend`] and writes them to disk.
pub struct TextureSynthesizer<'a> {
    backend: &'a dyn ImageBackend,
    config: &'a PipelineConfig,
}

impl<'a> TextureSynthesizer<'a> {
    pub fn new(backend: &'a dyn ImageBackend, config: &'a PipelineConfig) -> Self {
        Self { backend, config }
    }

    /// Generates the texture for `name` and writes it to
    /// `<output_dir>/Texture<index>.png`, replacing any existing file.
    ///
    /// Every image the service returns is written to that same path in turn,
    /// so with several images the last one remains on disk. All are returned.
    pub async fn synthesize(
        &self,
        index: usize,
        name: &MaterialName,
        output_dir: &Path,
    ) -> Result<Vec<TextureArtifact>> {
        if let Err(e) = self.backend.set_checkpoint(&self.config.checkpoint).await {
            tracing::warn!(error = %e, checkpoint = %self.config.checkpoint, "could not select checkpoint");
        }

        let prompt = self.config.image_prompt(name.as_str());
        let images = self.backend.generate(&prompt, &self.config.generation).await?;
        if images.is_empty() {
            tracing::warn!(index, %prompt, "image service returned no images");
        }

        let path = output_dir.join(texture_file_name(index));
        let mut artifacts = Vec::with_capacity(images.len());

        for encoded in &images {
            let raw = self.backend.decode(encoded)?;
            let info = self.backend.describe_image(encoded).await?;
            let png = embed_text_chunk(&raw, PARAMETERS_KEY, &info)?;

            tokio::fs::write(&path, &png).await?;
            tracing::info!(index, name = %name, path = %path.display(), "texture written");

            artifacts.push(TextureArtifact {
                index,
                path: path.clone(),
                image_bytes: png,
                metadata_text: info,
            });
        }

        Ok(artifacts)
    }
}
