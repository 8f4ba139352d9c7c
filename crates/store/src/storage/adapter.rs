//! Typed persistence façade used by the stores.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{error, warn};

use super::{StorageBackend, StorageEvent, TabId};

/// Typed load/save of one JSON array per key, bound to a tab identity.
///
/// This is the swallow boundary of the failure model: a missing, unreadable,
/// or unparseable value loads as the empty collection, and write failures are
/// logged and dropped. Callers above this layer never see a storage error.
pub struct PersistenceAdapter<B> {
    backend: Arc<B>,
    tab: TabId,
}

impl<B> Clone for PersistenceAdapter<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            tab: self.tab,
        }
    }
}

impl<B: StorageBackend> PersistenceAdapter<B> {
    /// Bind a backend to a freshly generated tab identity.
    #[must_use]
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_tab(backend, TabId::new())
    }

    /// Bind a backend to an existing tab identity.
    ///
    /// Both stores of one tab share the identity so that either store's
    /// writes are recognized as same-tab by the other's sync task.
    #[must_use]
    pub const fn with_tab(backend: Arc<B>, tab: TabId) -> Self {
        Self { backend, tab }
    }

    /// The tab identity stamped onto this adapter's writes.
    #[must_use]
    pub const fn tab(&self) -> TabId {
        self.tab
    }

    /// Subscribe to the backend's change events.
    pub fn changes(&self) -> broadcast::Receiver<StorageEvent> {
        self.backend.subscribe()
    }

    /// Load the items stored under `key`.
    ///
    /// Absent, unreadable, or corrupt storage yields an empty vector, never
    /// an error. Corruption is deliberately swallowed so that a damaged
    /// storage entry cannot take the UI down; the next save overwrites it.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.read(key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "storage read failed, treating as empty");
                return Vec::new();
            }
        };
        let Some(raw) = raw else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt storage value");
                Vec::new()
            }
        }
    }

    /// Serialize `items` and write them under `key`.
    ///
    /// The backend broadcasts the change to other tabs after the write. A
    /// failure (e.g., the disk's analogue of a quota error) is logged and
    /// swallowed; the in-memory state keeps the mutation and the next save
    /// retries the full snapshot.
    pub async fn save<T: Serialize>(&self, key: &str, items: &[T]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                error!(key, error = %e, "failed to serialize items, skipping save");
                return;
            }
        };
        if let Err(e) = self.backend.write(key, json, self.tab).await {
            error!(key, error = %e, "storage write failed, state not persisted");
        }
    }
}
