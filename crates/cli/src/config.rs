//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SEAGRAPE_DATA_DIR` - Storage directory (default: `.seagrape`)

use std::path::PathBuf;

use thiserror::Error;

const DATA_DIR_VAR: &str = "SEAGRAPE_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".seagrape";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the storage files.
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `SEAGRAPE_DATA_DIR` is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = data_dir_from(std::env::var(DATA_DIR_VAR).ok())?;
        Ok(Self { data_dir })
    }
}

fn data_dir_from(value: Option<String>) -> Result<PathBuf, ConfigError> {
    match value {
        Some(dir) if dir.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            DATA_DIR_VAR,
            "must not be empty".to_string(),
        )),
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(PathBuf::from(DEFAULT_DATA_DIR)),
    }
}
