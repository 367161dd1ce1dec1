//! Run files.
//!
//! `tilemaker -f run.yaml` reads the inputs of a run from a file instead of
//! flags. `-f -` reads the same document from stdin. YAML is the default;
//! a `.json` extension selects JSON.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Source name that selects stdin.
pub const STDIN_SOURCE: &str = "-";

/// Error type for run-file loading.
#[derive(Debug, Error)]
pub enum RunFileError {
    #[error("cannot read run file {source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: io::Error,
    },
    #[error("invalid run file {source_name}: {error}")]
    Yaml {
        source_name: String,
        #[source]
        error: serde_yaml::Error,
    },
    #[error("invalid run file {source_name}: {error}")]
    Json {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },
}

/// Inputs of one run. Every field is optional and overrides the context.
///
/// Unknown keys are rejected so a typo does not silently fall back to a
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunFile {
    pub theme: Option<String>,
    /// Relative paths are taken from the run file's folder.
    pub output_dir: Option<String>,
    pub sd_url: Option<String>,
    pub model: Option<String>,
    pub checkpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

impl RunFile {
    /// Loads a run file from `source`, a path or [`STDIN_SOURCE`].
    pub fn load(source: &str) -> Result<Self, RunFileError> {
        if source == STDIN_SOURCE {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .map_err(|error| RunFileError::Read {
                    source_name: "stdin".to_string(),
                    error,
                })?;
            return Self::parse(&data, Format::Yaml, "stdin");
        }

        let path = Path::new(source);
        let data = std::fs::read(path).map_err(|error| RunFileError::Read {
            source_name: source.to_string(),
            error,
        })?;
        let mut run = Self::parse(&data, Format::of(path), source)?;
        if let (Some(dir), Some(parent)) = (run.output_dir.as_deref(), path.parent()) {
            run.output_dir = Some(resolve_relative(parent, dir).display().to_string());
        }
        Ok(run)
    }

    /// Loads the run file named by `-f`, or an empty one without it.
    pub fn load_optional(source: Option<&str>) -> Result<Self, RunFileError> {
        match source {
            Some(source) => Self::load(source),
            None => Ok(Self::default()),
        }
    }

    /// Parses a YAML document. JSON input parses too, being valid YAML.
    pub fn from_yaml(text: &str) -> Result<Self, RunFileError> {
        Self::parse(text.as_bytes(), Format::Yaml, "<inline>")
    }

    fn parse(data: &[u8], format: Format, source_name: &str) -> Result<Self, RunFileError> {
        // An empty document means "no overrides".
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match format {
            Format::Yaml => serde_yaml::from_slice(data).map_err(|error| RunFileError::Yaml {
                source_name: source_name.to_string(),
                error,
            }),
            Format::Json => serde_json::from_slice(data).map_err(|error| RunFileError::Json {
                source_name: source_name.to_string(),
                error,
            }),
        }
    }
}

fn resolve_relative(base: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() || base.as_os_str().is_empty() {
        dir.to_path_buf()
    } else {
        base.join(dir)
    }
}
