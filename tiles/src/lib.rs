//! Themed seamless texture generation.
//!
//! A run asks a text-completion model for a handful of distinct material
//! names fitting a theme, renders a tileable texture for each name on a
//! Stable Diffusion web UI, and writes the results as PNG files carrying the
//! generation parameters.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use smarttile_tiles::{GenerationRequest, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let completer = smarttile_openai::Client::new("sk-...")?;
//! let backend = smarttile_sdwebui::Client::builder().base_url(&config.sd_url).build()?;
//! let pipeline = Pipeline::new(config, Arc::new(completer), Arc::new(backend));
//!
//! let request = GenerationRequest::new("zombie apocalypse", "sk-...", "/tmp/tiles");
//! let report = pipeline.run(&request).await?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod metadata;
pub mod names;
pub mod pipeline;
pub mod preflight;
pub mod request;
pub mod synth;

pub use backend::{CompletionError, ImageBackend, TextCompleter};
pub use config::{GenerationParams, PipelineConfig};
pub use error::{Result, TilesError};
pub use metadata::{embed_text_chunk, read_text_chunk, PARAMETERS_KEY};
pub use names::{name_prompt, MaterialName, NameSequencer};
pub use pipeline::{Pipeline, RunReport};
pub use preflight::{PreflightValidator, ValidationOutcome, HELP_URL};
pub use request::{
    mask_credential, Credential, CredentialSource, GenerationRequest, CREDENTIAL_ENV,
    MAX_THEME_CHARS,
};
pub use synth::{texture_file_name, TextureArtifact, TextureSynthesizer};
