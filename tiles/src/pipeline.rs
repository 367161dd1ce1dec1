//! A full generation run: preflight, names, textures.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::backend::{ImageBackend, TextCompleter};
use crate::config::PipelineConfig;
use crate::error::{Result, TilesError};
use crate::names::{check_name_count, MaterialName, NameSequencer};
use crate::preflight::{PreflightValidator, ValidationOutcome};
use crate::request::GenerationRequest;
use crate::synth::{TextureArtifact, TextureSynthesizer};

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub names: Vec<MaterialName>,
    pub artifacts: Vec<TextureArtifact>,
}

impl RunReport {
    /// Distinct file paths written, in write order.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for artifact in &self.artifacts {
            if !paths.contains(&artifact.path) {
                paths.push(artifact.path.clone());
            }
        }
        paths
    }
}

/// Composes the preflight checks, the name sequence and texture synthesis.
///
/// Every step runs sequentially.
pub struct Pipeline {
    config: PipelineConfig,
    completer: Arc<dyn TextCompleter>,
    backend: Arc<dyn ImageBackend>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        completer: Arc<dyn TextCompleter>,
        backend: Arc<dyn ImageBackend>,
    ) -> Self {
        Self {
            config,
            completer,
            backend,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs only the preflight checks.
    ///
    /// `request.credential()` is checked for encoding only; the completion
    /// check goes through the completer, so both must hold the same key.
    pub async fn preflight(&self, request: &GenerationRequest) -> ValidationOutcome {
        PreflightValidator::new(
            self.completer.as_ref(),
            self.backend.as_ref(),
            self.config.temperature,
            self.config.max_tokens,
        )
        .validate(request)
        .await
    }

    /// Runs only the name sequence.
    pub async fn generate_names(&self, theme: &str) -> Result<Vec<MaterialName>> {
        NameSequencer::new(
            self.completer.as_ref(),
            self.config.temperature,
            self.config.max_tokens,
            self.config.name_count,
        )
        .generate_names(theme)
        .await
    }

    /// Runs preflight, then generates all names, then one texture per name.
    ///
    /// A zero `name_count` fails with [`TilesError::Config`] before anything
    /// is contacted. A failed preflight returns [`TilesError::Preflight`]
    /// without side effects. Any later failure aborts the run; files already written stay.
    pub async fn run(&self, request: &GenerationRequest) -> Result<RunReport> {
        check_name_count(self.config.name_count)?;

        let outcome = self.preflight(request).await;
        if !outcome.is_ok() {
            return Err(TilesError::Preflight(outcome));
        }

        tracing::info!(theme = %request.theme(), dir = %request.output_dir().display(), "generating textures");

        let names = self.generate_names(request.theme()).await?;

        let synthesizer = TextureSynthesizer::new(self.backend.as_ref(), &self.config);
        let mut artifacts = Vec::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            artifacts.extend(
                synthesizer
                    .synthesize(index, name, request.output_dir())
                    .await?,
            );
        }

        Ok(RunReport { names, artifacts })
    }
}
