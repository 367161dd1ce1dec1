//! Path utilities for smarttile applications.

use std::io;
use std::path::{Path, PathBuf};

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".smarttile";

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Folder under the home directory where textures land unless told otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "Smart-Tile-Maker";

/// Provides access to the smarttile directory structure.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Application name.
    pub app_name: String,
    /// User's home directory.
    pub home_dir: PathBuf,
}

impl Paths {
    /// Creates a new Paths instance for the given app.
    pub fn new(app_name: impl Into<String>) -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self::with_home(app_name, home_dir))
    }

    /// Creates a Paths instance rooted at an explicit home directory.
    pub fn with_home(app_name: impl Into<String>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Returns the base smarttile directory (~/.smarttile).
    pub fn base_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_BASE_DIR)
    }

    /// Returns the app-specific directory (~/.smarttile/<app>).
    pub fn app_dir(&self) -> PathBuf {
        self.base_dir().join(&self.app_name)
    }

    /// Returns the config file path (~/.smarttile/<app>/config.yaml).
    pub fn config_file(&self) -> PathBuf {
        self.app_dir().join(DEFAULT_CONFIG_FILE)
    }

    /// Returns the default texture output directory (~/Smart-Tile-Maker).
    pub fn output_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_OUTPUT_DIR)
    }

    /// Creates the app directory if it doesn't exist.
    pub fn ensure_app_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.app_dir())
    }

    /// Creates the default output directory if it doesn't exist and returns it.
    pub fn ensure_output_dir(&self) -> io::Result<PathBuf> {
        let dir = self.output_dir();
        ensure_dir(&dir)?;
        Ok(dir)
    }
}

/// Creates `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_new() {
        let paths = Paths::new("testapp").unwrap();
        assert_eq!(paths.app_name, "testapp");
        assert!(!paths.home_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_paths_structure() {
        let paths = Paths::with_home("tilemaker", "/home/u");

        assert_eq!(paths.base_dir(), PathBuf::from("/home/u/.smarttile"));
        assert_eq!(paths.app_dir(), PathBuf::from("/home/u/.smarttile/tilemaker"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/home/u/.smarttile/tilemaker/config.yaml")
        );
        assert_eq!(paths.output_dir(), PathBuf::from("/home/u/Smart-Tile-Maker"));
    }

    #[test]
    fn test_ensure_output_dir() {
        let home = tempfile::tempdir().unwrap();
        let paths = Paths::with_home("tilemaker", home.path());

        let dir = paths.ensure_output_dir().unwrap();
        assert!(dir.is_dir());
        // Second call is a no-op.
        assert_eq!(paths.ensure_output_dir().unwrap(), dir);

        paths.ensure_app_dir().unwrap();
        assert!(paths.app_dir().is_dir());
    }
}
