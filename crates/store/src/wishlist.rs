//! The wishlist store.
//!
//! A deduplicated list of saved product snapshots with a smaller mutation
//! surface than the cart: add and remove only. Persistence and cross-tab
//! behavior mirror the cart store.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use seagrape_core::{ProductId, SavedProduct};

use crate::storage::{PersistenceAdapter, StorageBackend, TabId, WISHLIST_KEY};

/// The wishlist for one tab.
///
/// Cheaply cloneable; clones share state. Adding a product that is already
/// saved is a no-op, as is removing one that is not there.
pub struct WishlistStore<B: StorageBackend> {
    inner: Arc<WishlistInner<B>>,
}

impl<B: StorageBackend> Clone for WishlistStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct WishlistInner<B: StorageBackend> {
    adapter: PersistenceAdapter<B>,
    state: watch::Sender<Vec<SavedProduct>>,
    write_lock: Mutex<()>,
}

impl<B: StorageBackend> WishlistStore<B> {
    /// Open the wishlist, hydrating from persisted storage.
    pub async fn open(adapter: PersistenceAdapter<B>) -> Self {
        let items = dedupe(adapter.load(WISHLIST_KEY).await);
        let (state, _) = watch::channel(items);
        Self {
            inner: Arc::new(WishlistInner {
                adapter,
                state,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Save a product. No-op (and no persist) if its id is already saved.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn add(&self, product: SavedProduct) {
        let _guard = self.inner.write_lock.lock().await;
        let mut items = self.inner.state.borrow().clone();
        if items.iter().any(|saved| saved.id == product.id) {
            debug!("product already saved");
            return;
        }
        items.push(product);
        self.commit(items).await;
    }

    /// Remove a saved product. Silent no-op if absent.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn remove(&self, id: ProductId) {
        let _guard = self.inner.write_lock.lock().await;
        let mut items = self.inner.state.borrow().clone();
        let before = items.len();
        items.retain(|saved| saved.id != id);
        if items.len() == before {
            debug!("product not in wishlist");
        }
        self.commit(items).await;
    }

    async fn commit(&self, items: Vec<SavedProduct>) {
        self.inner.adapter.save(WISHLIST_KEY, &items).await;
        self.inner.state.send_replace(items);
    }

    /// Snapshot of the saved products, in save order.
    #[must_use]
    pub fn items(&self) -> Vec<SavedProduct> {
        self.inner.state.borrow().clone()
    }

    /// Observe this tab's wishlist state (UI re-render hook).
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Vec<SavedProduct>> {
        self.inner.state.subscribe()
    }

    /// The tab identity this store writes under.
    #[must_use]
    pub fn tab(&self) -> TabId {
        self.inner.adapter.tab()
    }

    /// Replace the in-memory state wholesale from storage.
    #[instrument(skip(self))]
    pub async fn reload(&self) {
        let _guard = self.inner.write_lock.lock().await;
        let items = dedupe(self.inner.adapter.load(WISHLIST_KEY).await);
        self.inner.state.send_replace(items);
    }

    /// Spawn the background task that reloads this store on foreign writes.
    pub fn spawn_sync(&self) -> JoinHandle<()> {
        let store = self.clone();
        let mut events = store.inner.adapter.changes();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if event.key == WISHLIST_KEY && event.origin != store.tab() {
                            store.reload().await;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "wishlist event stream lagged, reloading");
                        store.reload().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Drop duplicate ids from a loaded wishlist; the first occurrence wins.
fn dedupe(items: Vec<SavedProduct>) -> Vec<SavedProduct> {
    let mut out: Vec<SavedProduct> = Vec::with_capacity(items.len());
    for item in items {
        if out.iter().any(|saved| saved.id == item.id) {
            warn!(product = %item.id, "dropping duplicate persisted wishlist entry");
            continue;
        }
        out.push(item);
    }
    out
}
