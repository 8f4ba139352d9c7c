//! CLI command implementations.

use std::sync::Arc;

use thiserror::Error;

use seagrape_store::{DiskStorage, StorageError, StoreContext};

use crate::config::{CliConfig, ConfigError};

pub mod cart;
pub mod wishlist;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Open a store context on the configured storage directory.
pub(crate) async fn open_context() -> Result<StoreContext<DiskStorage>, CliError> {
    let config = CliConfig::from_env()?;
    let backend = Arc::new(DiskStorage::open(config.data_dir)?);
    Ok(StoreContext::open(backend).await)
}
