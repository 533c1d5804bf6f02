//! Configuration for locating template files

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for the template loader
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Directory containing the template files
    pub root: PathBuf,

    /// Whether to descend into subdirectories
    pub recursive: bool,

    /// File extensions (without dot) that are treated as template files
    pub extensions: Vec<String>,
}

/// TOML structure for deserializing loader configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLoaderConfig {
    templates_dir: Option<PathBuf>,
    recursive: Option<bool>,
    extensions: Option<Vec<String>>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("templates"),
            recursive: true,
            extensions: vec!["yml".to_string(), "yaml".to_string()],
        }
    }
}

impl LoaderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// A relative `templates_dir` is taken relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        Ok(config)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlLoaderConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(LoaderConfig {
            root: parsed.templates_dir.unwrap_or(defaults.root),
            recursive: parsed.recursive.unwrap_or(defaults.recursive),
            extensions: parsed.extensions.unwrap_or(defaults.extensions),
        })
    }

    /// Set the template root directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set whether subdirectories are searched
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the accepted file extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether a path has one of the accepted extensions
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.root, PathBuf::from("templates"));
        assert!(config.recursive);
        assert!(config.matches(Path::new("a/b.yml")));
        assert!(config.matches(Path::new("a/b.YAML")));
        assert!(!config.matches(Path::new("a/b.txt")));
        assert!(!config.matches(Path::new("a/yml")));
    }

    #[test]
    fn test_builder_pattern() {
        let config = LoaderConfig::new()
            .with_root("/tmp/chronicles")
            .with_recursive(false)
            .with_extensions(["tpl"]);

        assert_eq!(config.root, PathBuf::from("/tmp/chronicles"));
        assert!(!config.recursive);
        assert_eq!(config.extensions, vec!["tpl".to_string()]);
    }

    #[test]
    fn test_parse_toml() {
        let config = LoaderConfig::from_str(
            r#"
templates_dir = "chronicles"
recursive = false
"#,
        )
        .expect("Should parse");
        assert_eq!(config.root, PathBuf::from("chronicles"));
        assert!(!config.recursive);
        assert_eq!(config.extensions, LoaderConfig::default().extensions);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = LoaderConfig::from_str("").expect("Should parse");
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(LoaderConfig::from_str("templates_dir = [").is_err());
        assert!(LoaderConfig::from_str("unknown = 1").is_err());
    }

    #[test]
    fn test_from_file_relative_root() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("chronicles.toml");
        std::fs::write(&path, "templates_dir = \"tpl\"\n").expect("Should write");
        let config = LoaderConfig::from_file(&path).expect("Should load");
        assert_eq!(config.root, dir.path().join("tpl"));
    }
}
