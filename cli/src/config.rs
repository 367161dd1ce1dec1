//! Configuration management for CLI tools.
//!
//! Configuration is stored in ~/.smarttile/{app_name}/config.yaml and holds
//! named contexts, similar to kubectl's.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::Paths;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application name (not serialized).
    #[serde(skip)]
    pub app_name: String,

    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Map of context name to context configuration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contexts: HashMap<String, Context>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// One named set of credentials and service addresses.
///
/// Empty fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Completion API key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Completion API base URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Stable Diffusion web UI address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sd_url: String,

    /// Folder textures are written to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output_dir: String,

    /// Model checkpoint selected before each texture.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checkpoint: String,

    /// Completion model.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,

    /// Request timeout in seconds; zero leaves the transport default.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl Config {
    /// Gets the default config file path.
    pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
        Paths::new(app_name).ok().map(|p| p.config_file())
    }

    /// Returns the config file path.
    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds or replaces a context.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        self.save()
    }

    /// Deletes a context.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Sets the current context.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    /// Gets a specific context.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Gets the current context.
    pub fn get_current_context(&self) -> Option<&Context> {
        if self.current_context.is_empty() {
            return None;
        }
        self.contexts.get(&self.current_context)
    }

    /// Resolves the context by name, or current context if name is empty.
    pub fn resolve_context(&self, name: Option<&str>) -> Option<&Context> {
        match name {
            Some(n) if !n.is_empty() => self.get_context(n),
            _ => self.get_current_context(),
        }
    }

    /// Lists all context names, sorted.
    pub fn list_contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

fn config_path(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<PathBuf> {
    match custom_path {
        Some(p) => Ok(PathBuf::from(p)),
        None => Config::default_config_path(app_name)
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path")),
    }
}

/// Loads configuration for the specified app, creating an empty file if none
/// exists yet.
pub fn load_config(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = config_path(app_name, custom_path)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        cfg
    };

    cfg.app_name = app_name.to_string();
    cfg.config_path = config_path;

    Ok(cfg)
}

/// Saves configuration to the specified path.
pub fn save_config(app_name: &str, config: &Config, custom_path: Option<&str>) -> anyhow::Result<()> {
    let config_path = config_path(app_name, custom_path)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&config_path, serde_yaml::to_string(config)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let cfg = load_config("tilemaker", path.to_str()).unwrap();
        (dir, cfg)
    }

    #[test]
    fn test_load_creates_file() {
        let (_dir, cfg) = temp_config();
        assert!(cfg.path().exists());
        assert!(cfg.contexts.is_empty());
        assert_eq!(cfg.app_name, "tilemaker");
    }

    #[test]
    fn test_context_lifecycle() {
        let (_dir, mut cfg) = temp_config();
        let path = cfg.path().to_str().unwrap().to_string();

        cfg.add_context(
            "local",
            Context {
                api_key: "sk-local-1234567890".into(),
                sd_url: "http://127.0.0.1:7860".into(),
                timeout: 30,
                ..Default::default()
            },
        )
        .unwrap();
        cfg.add_context("remote", Context::default()).unwrap();
        cfg.use_context("local").unwrap();

        let reloaded = load_config("tilemaker", Some(&path)).unwrap();
        assert_eq!(reloaded.current_context, "local");
        assert_eq!(reloaded.list_contexts(), vec!["local", "remote"]);
        let ctx = reloaded.resolve_context(None).unwrap();
        assert_eq!(ctx.name, "local");
        assert_eq!(ctx.timeout, 30);
        assert_eq!(reloaded.resolve_context(Some("remote")).unwrap().name, "remote");
        assert!(reloaded.resolve_context(Some("missing")).is_none());

        cfg.delete_context("local").unwrap();
        assert!(cfg.current_context.is_empty());
        assert!(cfg.get_current_context().is_none());
        assert!(cfg.delete_context("local").is_err());
        assert!(cfg.use_context("local").is_err());
    }

    #[test]
    fn test_empty_fields_not_serialized() {
        let ctx = Context {
            name: "x".into(),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&ctx).unwrap();
        assert_eq!(yaml.trim(), "name: x");
    }

    #[test]
    fn test_save_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = Config::default();
        cfg.current_context = "a".into();

        save_config("tilemaker", &cfg, path.to_str()).unwrap();
        let loaded = load_config("tilemaker", path.to_str()).unwrap();
        assert_eq!(loaded.current_context, "a");
    }
}
