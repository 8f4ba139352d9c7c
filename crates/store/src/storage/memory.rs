//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;

use crate::error::StorageError;

use super::{EVENT_CHANNEL_CAPACITY, StorageBackend, StorageEvent, TabId, validate_key};

/// Volatile storage backend.
///
/// Keeps values in a process-local map. Used by tests and by embedders that
/// handle durability themselves; the change broadcast behaves exactly like
/// the disk backend's, so cross-tab behavior can be exercised without a
/// filesystem.
#[derive(Debug)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Pre-seed a key, without broadcasting.
    ///
    /// Test/setup helper for simulating pre-existing (or corrupted) storage.
    pub fn seed(&self, key: &str, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String, origin: TabId) -> Result<(), StorageError> {
        validate_key(key)?;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        // No subscribers is fine; the send result only reports that.
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            origin,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let storage = MemoryStorage::new();
        storage
            .write("cart", "[]".to_string(), TabId::new())
            .await
            .unwrap();
        assert_eq!(storage.read("cart").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_write_broadcasts_to_subscribers() {
        let storage = MemoryStorage::new();
        let mut events = storage.subscribe();
        let tab = TabId::new();
        storage
            .write("wishlist", "[]".to_string(), tab)
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.key, "wishlist");
        assert_eq!(event.origin, tab);
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let storage = MemoryStorage::new();
        assert!(storage.read("a/b").await.is_err());
        assert!(
            storage
                .write("../c", String::new(), TabId::new())
                .await
                .is_err()
        );
    }
}
