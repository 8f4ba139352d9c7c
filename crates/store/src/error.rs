//! Storage error types.
//!
//! These surface only from backend construction and from inside the
//! persistence layer. The public store operations never propagate them;
//! failures past the adapter boundary are logged and swallowed so that UI
//! callers can rely on the operations never raising.

use thiserror::Error;

/// Errors from the storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized or parsed.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key is not usable as a storage name.
    #[error("invalid storage key {0:?}: keys must not contain path separators")]
    InvalidKey(String),
}
