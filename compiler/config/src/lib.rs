#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Stencil run configuration.
//!
//! This crate provides configuration management for a pipeline run. It
//! handles loading and saving configuration files that specify:
//! - where the serialized code-generator request lives,
//! - which directory of generated sources to post-process,
//! - logging parameters.
//!
//! Configuration is stored in TOML format and can be loaded from files or
//! created with sensible defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path.
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
}

/// Main configuration structure for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Where the serialized code-generator request lives.
    pub request: RequestConfig,
    /// The source tree to post-process.
    pub sources: SourcesConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Location of the serialized code-generator request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Path to the binary request file produced by the compiler.
    pub path: PathBuf,
}

/// The source tree a run operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Root directory of the generated sources.
    pub root: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error).
    pub level: String,
    /// Log file path (optional).
    pub file: Option<PathBuf>,
}

impl RunConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            request: RequestConfig { path: PathBuf::from("descriptors/request.bin") },
            sources: SourcesConfig { root: PathBuf::from("generated") },
            logging: LoggingConfig { level: "info".to_string(), file: None },
        }
    }
}
