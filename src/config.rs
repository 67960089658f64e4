//! Publisher configuration
//!
//! Defines the configuration surface consumed by the pipeline and its TOML
//! loader. Accumulation and publishing may both be configured; at runtime an
//! accumulation directory always wins and suppresses network calls.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Configuration for one publish pipeline invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Send the build record to the repository
    #[serde(default)]
    pub publish_build_info: bool,

    /// Deploy reconciled artifacts to the repository
    #[serde(default)]
    pub publish_artifacts: bool,

    /// Publish even when the build had test failures
    #[serde(default)]
    pub even_unstable: bool,

    /// Accumulate artifacts and build info here instead of publishing
    pub accumulate_dir: Option<PathBuf>,

    /// Deploy only artifact paths matching one of these globs (empty = all)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Never deploy artifact paths matching one of these globs
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Base URL of the target repository
    #[serde(default)]
    pub repository_url: String,

    /// Where to export the build record (default: <base>/target/build-info.json)
    pub export_file: Option<PathBuf>,
}

impl PublisherConfig {
    /// Load and parse config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: PublisherConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (self.publish_build_info || self.publish_artifacts)
            && self.accumulate_dir.is_none()
            && self.repository_url.is_empty()
        {
            return Err(ConfigError::Validation(
                "'repository_url' is required when publishing is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the export location for the build record
    pub fn export_path(&self, base_dir: &Path) -> PathBuf {
        self.export_file
            .clone()
            .unwrap_or_else(|| base_dir.join("target/build-info.json"))
    }
}
