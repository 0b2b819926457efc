use crate::errors::{FileFormat, FileOperation, IoError, ParseError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(scaffy::config::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// The external command that initializes a module manifest.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleConfig {
    pub program: String,
    pub args: Vec<String>,
}
impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            program: "go".to_string(),
            args: vec!["mod".to_string(), "init".to_string()],
        }
    }
}

/// Which files get a declaration line and what it says.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    /// Marker extension of recognized source files, without the dot.
    pub extension: String,
    /// Base name of the conventional entry-point file.
    pub entry_point: String,
    /// Declaration value used for entry-point files.
    pub sentinel: String,
    pub keyword: String,
}
impl Default for StampConfig {
    fn default() -> Self {
        Self {
            extension: "go".to_string(),
            entry_point: "main.go".to_string(),
            sentinel: "main".to_string(),
            keyword: "package".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub module: ModuleConfig,
    pub stamp: StampConfig,
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed: Config = toml::from_str(&content)
            .map_err(|error| ParseError::new(FileFormat::Toml, path.to_path_buf(), error))?;

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scaffy.toml");
        fs::write(&file, "[stamp]\nextension = \"rs\"\n").unwrap();

        let config = Config::from_file(&file).unwrap();

        assert_eq!(config.stamp.extension, "rs");
        assert_eq!(config.stamp.sentinel, "main");
        assert_eq!(config.module, ModuleConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scaffy.toml");
        fs::write(&file, "[module]\nprogram = ").unwrap();

        let error = Config::from_file(&file).unwrap_err();

        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scaffy.toml");
        fs::write(&file, "[module]\nprogramm = \"cargo\"\n").unwrap();

        assert!(matches!(
            Config::from_file(&file),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_config_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let error = Config::from_file(dir.path().join("absent.toml")).unwrap_err();

        assert!(matches!(error, ConfigError::Io(_)));
    }
}
