//! Optional per-solution configuration.
//!
//! Read from `.ariadne.yaml` next to the solution file. Every field has a
//! default, so a missing file or a partial file is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration file name, looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = ".ariadne.yaml";

/// Navigation settings for one workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Skip documents whose text does not mention the target name before
    /// binding them.
    pub prefilter: bool,

    /// Directory names never descended into when discovering sources.
    pub excluded_dirs: Vec<String>,

    /// File extension of behavior feature files, without the dot.
    pub feature_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefilter: true,
            excluded_dirs: ["bin", "obj", "node_modules", ".git", ".vs"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            feature_extension: "feature".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file can't be read and [`Error::Config`]
    /// if it isn't valid YAML for this shape.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed YAML.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load `.ariadne.yaml` from `dir`, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Propagates read and parse failures of an existing file.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Whether a directory name is excluded from source discovery.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").expect("empty config should parse");

        assert_eq!(config, Config::default());
        assert!(config.prefilter);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = Config::parse("prefilter: false\n").expect("should parse");

        assert!(!config.prefilter);
        assert_eq!(config.feature_extension, "feature");
        assert!(config.is_excluded_dir("obj"));
    }

    #[test]
    fn excluded_dirs_match_case_insensitively() {
        let config = Config::parse("excluded-dirs: [Generated]\n").expect("should parse");

        assert!(config.is_excluded_dir("generated"));
        assert!(!config.is_excluded_dir("bin"));
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = Config::parse("prefilter: [unterminated").expect_err("should fail");

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");

        let config = Config::discover(dir.path()).expect("should fall back to defaults");

        assert_eq!(config, Config::default());
    }
}
