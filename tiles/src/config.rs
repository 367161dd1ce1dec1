//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use smarttile_openai::DEFAULT_COMPLETION_MODEL;
use smarttile_sdwebui::{CHECKPOINT_TEXTURE_DIFFUSION, DEFAULT_BASE_URL};

/// Number of material names (and textures) produced per run.
pub const DEFAULT_NAME_COUNT: usize = 5;

/// Sampling temperature for name generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Output-length cap for name generation.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Prefix biasing prompts toward physically-based-rendering materials.
pub const DEFAULT_PROMPT_PREFIX: &str = "PBR, ";

/// Configuration for a texture generation run.
///
/// Every field has a default, so a partial YAML/JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stable Diffusion web UI base URL.
    pub sd_url: String,

    /// Completion model used for material names.
    pub completion_model: String,

    /// Checkpoint selected before each synthesis.
    pub checkpoint: String,

    pub temperature: f32,
    pub max_tokens: u32,

    /// Names generated per run, 5 unless a caller overrides it. Zero is
    /// rejected when a run starts.
    pub name_count: usize,

    /// Text placed before each material name in the image prompt.
    pub prompt_prefix: String,

    /// Image generation parameters.
    pub generation: GenerationParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sd_url: DEFAULT_BASE_URL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            checkpoint: CHECKPOINT_TEXTURE_DIFFUSION.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            name_count: DEFAULT_NAME_COUNT,
            prompt_prefix: DEFAULT_PROMPT_PREFIX.to_string(),
            generation: GenerationParams::default(),
        }
    }
}

impl PipelineConfig {
    /// Builds the image prompt for a material name.
    pub fn image_prompt(&self, material: &str) -> String {
        format!("{}{}", self.prompt_prefix, material)
    }
}

/// Parameters passed to the image service for every texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// -1 picks a random seed.
    pub seed: i64,
    pub batch_size: u32,
    pub n_iter: u32,
    pub steps: u32,
    pub cfg_scale: f32,
    pub width: u32,
    pub height: u32,
    pub tiling: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: -1,
            batch_size: 1,
            n_iter: 1,
            steps: 20,
            cfg_scale: 7.0,
            width: 512,
            height: 512,
            tiling: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.sd_url, "http://127.0.0.1:7860");
        assert_eq!(cfg.name_count, 5);
        assert_eq!(cfg.max_tokens, 150);
        assert!((cfg.temperature - 0.6).abs() < f32::EPSILON);
        assert_eq!(cfg.checkpoint, "TextureDiffusion_10.ckpt [ded387e0f3]");
        assert_eq!(cfg.image_prompt("Rust"), "PBR, Rust");
    }

    #[test]
    fn test_partial_document() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"prompt_prefix": "", "generation": {"steps": 30}}"#).unwrap();
        assert_eq!(cfg.image_prompt("Rust"), "Rust");
        assert_eq!(cfg.generation.steps, 30);
        assert_eq!(cfg.generation.width, 512);
        assert!(cfg.generation.tiling);
        assert_eq!(cfg.name_count, 5);
    }
}
