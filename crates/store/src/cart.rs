//! The cart store.
//!
//! Owns the tab-local list of cart line items. Every mutation recomputes the
//! new item list, writes it through the persistence adapter, and then
//! publishes it on the store's watch channel, so same-tab observers always
//! see count and total consistent with the items they derive from.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use seagrape_core::{CartLineItem, LineItemId, NewCartItem};

use crate::storage::{CART_KEY, PersistenceAdapter, StorageBackend, TabId};

/// The shopping cart for one tab.
///
/// Cheaply cloneable; clones share state. Mutating operations never fail:
/// unknown ids, duplicate adds, and out-of-range quantities are absorbed into
/// well-defined no-ops or clamping, and storage trouble degrades to
/// log-and-continue.
pub struct CartStore<B: StorageBackend> {
    inner: Arc<CartInner<B>>,
}

impl<B: StorageBackend> Clone for CartStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CartInner<B: StorageBackend> {
    adapter: PersistenceAdapter<B>,
    state: watch::Sender<Vec<CartLineItem>>,
    /// Serializes mutations and reloads; state replacement is a single
    /// watch send, so observers never see a torn update.
    write_lock: Mutex<()>,
}

impl<B: StorageBackend> CartStore<B> {
    /// Open the cart, hydrating from persisted storage.
    ///
    /// A cart persisted by an older client is normalized on the way in (see
    /// [`normalize`]); the next mutation rewrites storage in canonical form.
    pub async fn open(adapter: PersistenceAdapter<B>) -> Self {
        let items = normalize(adapter.load(CART_KEY).await);
        let (state, _) = watch::channel(items);
        Self {
            inner: Arc::new(CartInner {
                adapter,
                state,
                write_lock: Mutex::new(()),
            }),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product variant to the cart.
    ///
    /// The line identity is derived from `(product_id, size, color)`. If the
    /// line already exists its quantity goes up by one; otherwise a new line
    /// is appended with quantity 1. No stock check happens here; that is the
    /// backend's responsibility at checkout.
    #[instrument(skip(self, item), fields(product = %item.product_id))]
    pub async fn add_to_cart(&self, item: NewCartItem) {
        let _guard = self.inner.write_lock.lock().await;
        let id = item.line_item_id();
        let mut items = self.inner.state.borrow().clone();
        if let Some(line) = items.iter_mut().find(|line| line.id == id) {
            line.quantity = line.quantity.saturating_add(1);
            debug!(line = %id, quantity = line.quantity, "incremented cart line");
        } else {
            items.push(item.into_line_item());
            debug!(line = %id, "appended cart line");
        }
        self.commit(items).await;
    }

    /// Remove the line with the given id. Silent no-op if absent.
    #[instrument(skip(self), fields(line = %id))]
    pub async fn remove_from_cart(&self, id: &LineItemId) {
        let _guard = self.inner.write_lock.lock().await;
        let mut items = self.inner.state.borrow().clone();
        let before = items.len();
        items.retain(|line| line.id != *id);
        if items.len() == before {
            debug!("line not in cart");
        }
        self.commit(items).await;
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero removes the line entirely (quantities below 1 do
    /// not exist). Setting the quantity of an absent line is a silent no-op.
    #[instrument(skip(self), fields(line = %id, quantity))]
    pub async fn update_quantity(&self, id: &LineItemId, quantity: u32) {
        if quantity == 0 {
            self.remove_from_cart(id).await;
            return;
        }
        let _guard = self.inner.write_lock.lock().await;
        let mut items = self.inner.state.borrow().clone();
        if let Some(line) = items.iter_mut().find(|line| line.id == *id) {
            line.quantity = quantity;
        } else {
            debug!("line not in cart");
        }
        self.commit(items).await;
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        let _guard = self.inner.write_lock.lock().await;
        self.commit(Vec::new()).await;
    }

    /// Write the new state through storage, then notify this tab's observers.
    async fn commit(&self, items: Vec<CartLineItem>) {
        self.inner.adapter.save(CART_KEY, &items).await;
        self.inner.state.send_replace(items);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.inner.state.borrow().clone()
    }

    /// Total number of units across all lines.
    ///
    /// Derived from the items on every read; it cannot drift from them.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.inner
            .state
            .borrow()
            .iter()
            .map(|line| line.quantity)
            .sum()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.inner
            .state
            .borrow()
            .iter()
            .map(CartLineItem::line_total)
            .sum()
    }

    /// Observe this tab's cart state (UI re-render hook).
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Vec<CartLineItem>> {
        self.inner.state.subscribe()
    }

    /// The tab identity this store writes under.
    #[must_use]
    pub fn tab(&self) -> TabId {
        self.inner.adapter.tab()
    }

    // =========================================================================
    // Cross-tab synchronization
    // =========================================================================

    /// Replace the in-memory state wholesale from storage.
    ///
    /// The reload path for foreign-tab writes (last-writer-wins, no merge).
    /// Does not persist and does not re-broadcast.
    #[instrument(skip(self))]
    pub async fn reload(&self) {
        let _guard = self.inner.write_lock.lock().await;
        let items = normalize(self.inner.adapter.load(CART_KEY).await);
        self.inner.state.send_replace(items);
    }

    /// Spawn the background task that reloads this store on foreign writes.
    ///
    /// The task runs until aborted (dropping a [`crate::StoreContext`] does
    /// this) or until the backend's event channel closes. Own writes are
    /// skipped: same-tab observers were already notified by the mutation.
    pub fn spawn_sync(&self) -> JoinHandle<()> {
        let store = self.clone();
        let mut events = store.inner.adapter.changes();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if event.key == CART_KEY && event.origin != store.tab() {
                            store.reload().await;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Missed events may have included our key; resync.
                        warn!(skipped, "cart event stream lagged, reloading");
                        store.reload().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Normalize lines loaded from storage.
///
/// Storage may hold carts written by older clients or hand-edited values:
/// - ids are re-derived from `(product_id, size, color)`, upgrading legacy
///   carts that stored the bare catalog id
/// - lines whose derived ids collide merge into the first occurrence,
///   summing quantities
/// - zero-quantity lines are dropped (quantities below 1 do not exist)
/// - negative prices clamp to zero
fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut out: Vec<CartLineItem> = Vec::with_capacity(items.len());
    for mut line in items {
        if line.quantity == 0 {
            warn!(line = %line.id, "dropping persisted line with zero quantity");
            continue;
        }
        if line.price < Decimal::ZERO {
            warn!(line = %line.id, price = %line.price, "clamping negative price to zero");
            line.price = Decimal::ZERO;
        }
        let derived = line.derived_id();
        if line.id != derived {
            debug!(stored = %line.id, derived = %derived, "upgrading legacy line id");
            line.id = derived;
        }
        if let Some(existing) = out.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            out.push(line);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seagrape_core::ProductId;

    use crate::storage::MemoryStorage;

    use super::*;

    fn tee(size: &str, color: &str) -> NewCartItem {
        NewCartItem {
            product_id: ProductId::new(7),
            title: "Box Logo Tee".to_string(),
            price: Decimal::new(10000, 2),
            image: None,
            size: Some(size.to_string()),
            color: Some(color.to_string()),
        }
    }

    async fn open_store() -> (Arc<MemoryStorage>, CartStore<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::new());
        let store = CartStore::open(PersistenceAdapter::new(Arc::clone(&backend))).await;
        (backend, store)
    }

    #[tokio::test]
    async fn test_add_then_re_add_increments_quantity() {
        let (_backend, store) = open_store().await;

        store.add_to_cart(tee("M", "red")).await;
        assert_eq!(store.count(), 1);
        assert_eq!(store.total(), Decimal::new(10000, 2));

        store.add_to_cart(tee("M", "red")).await;
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 2);
        assert_eq!(store.count(), 2);
        assert_eq!(store.total(), Decimal::new(20000, 2));
    }

    #[tokio::test]
    async fn test_different_variants_get_separate_lines() {
        let (_backend, store) = open_store().await;

        store.add_to_cart(tee("M", "red")).await;
        store.add_to_cart(tee("L", "red")).await;

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items.first().unwrap().id.as_str(), "7-M-red");
        assert_eq!(items.get(1).unwrap().id.as_str(), "7-L-red");
    }

    #[tokio::test]
    async fn test_update_quantity() {
        let (_backend, store) = open_store().await;
        store.add_to_cart(tee("M", "red")).await;
        let id = store.items().first().unwrap().id.clone();

        store.update_quantity(&id, 5).await;
        assert_eq!(store.count(), 5);
        assert_eq!(store.total(), Decimal::new(50000, 2));
    }

    #[tokio::test]
    async fn test_update_quantity_to_zero_removes_line() {
        let (_backend, store) = open_store().await;
        store.add_to_cart(tee("M", "red")).await;
        let id = store.items().first().unwrap().id.clone();

        store.update_quantity(&id, 0).await;
        assert!(store.items().is_empty());
        assert_eq!(store.count(), 0);
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_quantity_unknown_line_is_noop() {
        let (_backend, store) = open_store().await;
        store.add_to_cart(tee("M", "red")).await;

        let ghost = LineItemId::for_variant(ProductId::new(99), None, None);
        store.update_quantity(&ghost, 3).await;

        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_line_leaves_cart_unchanged() {
        let (_backend, store) = open_store().await;
        store.add_to_cart(tee("M", "red")).await;
        store.add_to_cart(tee("L", "blue")).await;
        let before = store.items();

        let ghost = LineItemId::for_variant(ProductId::new(99), Some("S"), None);
        store.remove_from_cart(&ghost).await;

        assert_eq!(store.items(), before);
    }

    #[tokio::test]
    async fn test_clear_empties_cart() {
        let (_backend, store) = open_store().await;
        store.add_to_cart(tee("M", "red")).await;
        store.add_to_cart(tee("L", "blue")).await;

        store.clear().await;
        assert!(store.items().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_mutations_write_through_to_storage() {
        let (backend, store) = open_store().await;
        store.add_to_cart(tee("M", "red")).await;

        let raw = backend.read(CART_KEY).await.unwrap().unwrap();
        let persisted: Vec<CartLineItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, store.items());
    }

    #[tokio::test]
    async fn test_reopen_restores_items_in_order() {
        let (backend, store) = open_store().await;
        store.add_to_cart(tee("M", "red")).await;
        store.add_to_cart(tee("L", "blue")).await;
        store.add_to_cart(tee("M", "red")).await;
        let before = store.items();

        let reopened = CartStore::open(PersistenceAdapter::new(backend)).await;
        assert_eq!(reopened.items(), before);
    }

    #[tokio::test]
    async fn test_open_with_corrupt_storage_is_empty() {
        let backend = Arc::new(MemoryStorage::new());
        backend.seed(CART_KEY, "[{\"id\": oops");
        let store = CartStore::open(PersistenceAdapter::new(backend)).await;
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_watch_observes_mutations() {
        let (_backend, store) = open_store().await;
        let mut rx = store.watch();
        assert!(rx.borrow_and_update().is_empty());

        store.add_to_cart(tee("M", "red")).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn test_normalize_upgrades_legacy_ids_and_merges() {
        // A cart written by an older client: bare catalog ids, one duplicate.
        let legacy = |id: &str, qty: u32| CartLineItem {
            id: LineItemId::from(id.to_string()),
            product_id: ProductId::new(7),
            title: "Box Logo Tee".to_string(),
            price: Decimal::new(10000, 2),
            image: None,
            quantity: qty,
            size: Some("M".to_string()),
            color: Some("red".to_string()),
        };

        let normalized = normalize(vec![legacy("7", 1), legacy("7-M-red", 2)]);
        assert_eq!(normalized.len(), 1);
        let line = normalized.first().unwrap();
        assert_eq!(line.id.as_str(), "7-M-red");
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_normalize_drops_zero_quantity_and_clamps_price() {
        let line = |product: i32, qty: u32, cents: i64| CartLineItem {
            id: LineItemId::for_variant(ProductId::new(product), None, None),
            product_id: ProductId::new(product),
            title: "Item".to_string(),
            price: Decimal::new(cents, 2),
            image: None,
            quantity: qty,
            size: None,
            color: None,
        };

        let normalized = normalize(vec![line(1, 0, 100), line(2, 2, -500)]);
        assert_eq!(normalized.len(), 1);
        let kept = normalized.first().unwrap();
        assert_eq!(kept.quantity, 2);
        assert_eq!(kept.price, Decimal::ZERO);
    }
}
