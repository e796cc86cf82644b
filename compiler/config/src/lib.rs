#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! irbridge Configuration
//!
//! This crate provides configuration management for irbridge.
//! It handles loading, saving, and defaulting the configuration file that
//! specifies:
//! - Which engine backend to drive (engine tools or dry run)
//! - Where the engine's command-line tools live
//! - Logging configuration
//! - Default pass pipeline and debug-info settings
//!
//! Configuration is stored in TOML format. Every section is optional; missing
//! keys fall back to [`Config::default`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine backend settings
    pub engine: EngineConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Defaults applied when the caller does not say otherwise
    pub defaults: DefaultsConfig,
}

/// Which engine backend services calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Run the engine's command-line tools as subprocesses
    #[default]
    Command,
    /// Print the marshalled call instead of running it
    DryRun,
}

impl BackendKind {
    /// Get the string representation of the backend kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Command => "command",
            BackendKind::DryRun => "dry-run",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" => Ok(BackendKind::Command),
            "dry-run" | "dry_run" => Ok(BackendKind::DryRun),
            _ => Err(format!("Unknown engine backend: {} (expected `command` or `dry-run`)", s)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Engine backend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backend selection
    pub backend: BackendKind,
    /// Tool locations for the `command` backend
    pub tools: ToolPaths,
}

/// Locations of the engine's command-line tools.
///
/// Bare names are resolved through `PATH`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Graph / saved-model importer
    pub translate: PathBuf,
    /// Pass-pipeline driver and bytecode writer
    pub opt: PathBuf,
    /// Flat-buffer model importer
    pub flatbuffer_translate: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            translate: PathBuf::from("tf-mlir-translate"),
            opt: PathBuf::from("tf-opt"),
            flatbuffer_translate: PathBuf::from("flatbuffer_translate"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string() } }
}

/// Call defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Pass pipeline used by imports when none is given (absent = none)
    pub pass_pipeline: Option<String>,
    /// Print location info in emitted IR
    pub show_debug_info: bool,
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/irbridge/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("irbridge");
        Ok(config_dir.join("config.toml"))
    }

    /// Load `explicit` if given; otherwise the default path if it exists;
    /// otherwise built-in defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_from_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let toml_content = r#"
            [engine]
            backend = "dry-run"

            [engine.tools]
            translate = "/opt/tf/bin/tf-mlir-translate"
            opt = "/opt/tf/bin/tf-opt"
            flatbuffer_translate = "/opt/tf/bin/flatbuffer_translate"

            [logging]
            level = "debug"

            [defaults]
            pass_pipeline = "tf-standard-pipeline"
            show_debug_info = true
        "#;
        fs::write(&temp_file, toml_content).expect("Failed to write TOML content");

        let loaded = Config::from_file(&temp_file).expect("Failed to load config");
        assert_eq!(loaded.engine.backend, BackendKind::DryRun);
        assert_eq!(loaded.engine.tools.opt, PathBuf::from("/opt/tf/bin/tf-opt"));
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.defaults.pass_pipeline, Some("tf-standard-pipeline".to_string()));
        assert!(loaded.defaults.show_debug_info);

        // Test file not found error
        let result = Config::from_file("nonexistent_file.toml");
        match result.expect_err("Expected error for nonexistent file") {
            ConfigError::FileRead(_) => {}
            other => panic!("Expected FileRead error, got {:?}", other),
        }

        // Test parse error
        let bad = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&bad, "invalid toml content").expect("Failed to write invalid TOML");
        match Config::from_file(&bad).expect_err("Expected parse error for invalid TOML") {
            ConfigError::Parse(_) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file, "[engine.tools]\nopt = \"./bin/tf-opt\"\n")
            .expect("Failed to write TOML content");

        let loaded = Config::from_file(&temp_file).expect("Failed to load config");
        assert_eq!(loaded.engine.backend, BackendKind::Command);
        assert_eq!(loaded.engine.tools.opt, PathBuf::from("./bin/tf-opt"));
        assert_eq!(loaded.engine.tools.translate, PathBuf::from("tf-mlir-translate"));
        assert_eq!(loaded.logging.level, "info");
        assert_eq!(loaded.defaults.pass_pipeline, None);
    }

    #[test]
    fn test_save_round_trip() {
        let mut config = Config::default();
        config.defaults.pass_pipeline = Some(String::new());
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        config.save(&temp_file).expect("Failed to save config");
        let contents = fs::read_to_string(&temp_file).expect("Failed to read saved config");
        assert!(contents.contains("tf-opt"));
        assert!(contents.contains("command"));

        // An empty pipeline must survive as empty, not disappear as absent.
        let reloaded = Config::from_file(&temp_file).expect("Failed to reload config");
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.defaults.pass_pipeline, Some(String::new()));

        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let missing = temp_dir.path().join("nonexistent").join("config.toml");
        match config.save(&missing).expect_err("Expected write error") {
            ConfigError::FileRead(_) => (),
            other => panic!("Expected FileRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path().expect("Failed to get default config path");
        let path_str = path.to_str().expect("Path should be valid UTF-8");
        assert!(path_str.contains("irbridge"));
        assert!(path_str.ends_with("config.toml"));
    }

    #[test]
    fn test_load_or_default_explicit_missing_is_error() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let missing = temp_dir.path().join("absent.toml");
        assert!(Config::load_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("command".parse::<BackendKind>(), Ok(BackendKind::Command));
        assert_eq!("dry-run".parse::<BackendKind>(), Ok(BackendKind::DryRun));
        assert!("ffi".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::DryRun.to_string(), "dry-run");
    }
}
