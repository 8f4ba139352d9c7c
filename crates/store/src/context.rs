//! Per-tab composition root.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cart::CartStore;
use crate::storage::{PersistenceAdapter, StorageBackend, TabId};
use crate::wishlist::WishlistStore;

/// Everything one tab's UI needs: the cart and wishlist stores, already
/// hydrated and subscribed to cross-tab changes.
///
/// Built once per tab at application start and passed down to components;
/// never a hidden process-wide singleton. Cheaply cloneable via `Arc`, like
/// an application state object. Opening several contexts on the same backend
/// models several tabs of one browser: each sees the others' writes.
///
/// Dropping the last handle aborts the sync tasks; there is no explicit
/// destroy step beyond that, matching a tab closing.
pub struct StoreContext<B: StorageBackend> {
    inner: Arc<ContextInner<B>>,
}

impl<B: StorageBackend> Clone for StoreContext<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ContextInner<B: StorageBackend> {
    tab: TabId,
    cart: CartStore<B>,
    wishlist: WishlistStore<B>,
    sync_tasks: Vec<JoinHandle<()>>,
}

impl<B: StorageBackend> Drop for ContextInner<B> {
    fn drop(&mut self) {
        for task in &self.sync_tasks {
            task.abort();
        }
        debug!(tab = %self.tab, "store context closed");
    }
}

impl<B: StorageBackend> StoreContext<B> {
    /// Open a new tab on the given storage backend.
    ///
    /// Hydrates both stores from persisted storage and spawns their
    /// cross-tab sync tasks. The stores share one fresh [`TabId`], so either
    /// store's writes count as same-tab for both.
    pub async fn open(backend: Arc<B>) -> Self {
        let tab = TabId::new();
        let cart = CartStore::open(PersistenceAdapter::with_tab(Arc::clone(&backend), tab)).await;
        let wishlist = WishlistStore::open(PersistenceAdapter::with_tab(backend, tab)).await;
        let sync_tasks = vec![cart.spawn_sync(), wishlist.spawn_sync()];
        debug!(%tab, "store context opened");
        Self {
            inner: Arc::new(ContextInner {
                tab,
                cart,
                wishlist,
                sync_tasks,
            }),
        }
    }

    /// The cart store for this tab.
    #[must_use]
    pub fn cart(&self) -> &CartStore<B> {
        &self.inner.cart
    }

    /// The wishlist store for this tab.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore<B> {
        &self.inner.wishlist
    }

    /// This tab's identity on the backend.
    #[must_use]
    pub fn tab(&self) -> TabId {
        self.inner.tab
    }
}
