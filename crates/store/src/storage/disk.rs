//! Disk-backed storage backend.

use std::path::{Path, PathBuf};

use tokio::sync::broadcast;
use tracing::debug;

use crate::error::StorageError;

use super::{EVENT_CHANNEL_CAPACITY, StorageBackend, StorageEvent, TabId, validate_key};

/// Durable storage backend keeping one `<key>.json` file per key.
///
/// Writes land in a temp file first and are renamed into place, so readers
/// never observe a half-written value. All tabs of a process must share one
/// instance (behind an `Arc`) to see each other's change events.
#[derive(Debug)]
pub struct DiskStorage {
    dir: PathBuf,
    events: broadcast::Sender<StorageEvent>,
}

impl DiskStorage {
    /// Open a storage directory, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        debug!(dir = %dir.display(), "opened storage directory");
        Ok(Self { dir, events })
    }

    /// The directory backing this storage.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for DiskStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: String, origin: TabId) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&tmp, value.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;
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
