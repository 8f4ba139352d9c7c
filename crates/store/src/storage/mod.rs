//! Durable key-value persistence with cross-tab change notification.
//!
//! A [`StorageBackend`] stores one JSON string per key and broadcasts a
//! [`StorageEvent`] to every subscriber after each write. Events carry the
//! writing tab's [`TabId`] so that a tab can distinguish its own writes
//! (already applied in memory) from foreign ones (which trigger a reload).
//!
//! The broadcast bus is per-process: "tabs" are store contexts sharing one
//! backend instance, the way browser tabs share one storage origin. Separate
//! processes pointed at the same [`DiskStorage`] directory still get
//! last-writer-wins durability, but no push notification.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::StorageError;

mod adapter;
mod disk;
mod memory;

pub use adapter::PersistenceAdapter;
pub use disk::DiskStorage;
pub use memory::MemoryStorage;

/// Storage key holding the cart's line items.
///
/// Part of the stable persisted layout (a JSON array of line items); shared
/// across tabs and sessions. Nothing outside the cart store may write it.
pub const CART_KEY: &str = "cart";

/// Storage key holding the wishlist's product snapshots.
pub const WISHLIST_KEY: &str = "wishlist";

/// Capacity of the change-event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Identity of one tab (one [`crate::StoreContext`]) on a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    /// Generate a fresh tab identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A change notification emitted after every backend write.
#[derive(Debug, Clone)]
pub struct StorageEvent {
    /// The key that was written.
    pub key: String,
    /// The tab that performed the write.
    pub origin: TabId,
}

/// Durable storage of one string value per key, with change broadcast.
///
/// Methods take `&self`; implementations use interior mutability so a single
/// backend instance can be shared across tabs behind an `Arc`. Futures are
/// `Send` because stores call these from spawned sync tasks.
pub trait StorageBackend: Send + Sync + 'static {
    /// Read the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the underlying medium fails.
    fn read(&self, key: &str)
    -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Write `value` under `key`, then broadcast a [`StorageEvent`] tagged
    /// with `origin` to all subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the underlying medium fails. The event is
    /// only broadcast after a successful write.
    fn write(
        &self,
        key: &str,
        value: String,
        origin: TabId,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Subscribe to change events for every key in this backend.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}

/// Reject keys that would escape the backend's namespace.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_plain_names() {
        assert!(validate_key("cart").is_ok());
        assert!(validate_key("wishlist").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_path_like_names() {
        assert!(validate_key("").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key("c\\d").is_err());
    }
}
