//! Integration tests for cross-tab synchronization.
//!
//! Several contexts on one shared backend model several tabs of one browser
//! sharing a storage origin. Convergence is eventual and last-writer-wins.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use seagrape_core::{CartLineItem, ProductId};
use seagrape_integration_tests::{saved_product, variant_item, wait_changed};
use seagrape_store::{
    CART_KEY, CartStore, MemoryStorage, PersistenceAdapter, StorageBackend, StoreContext,
};

// =============================================================================
// Convergence
// =============================================================================

#[tokio::test]
async fn test_foreign_cart_write_converges_other_tabs() {
    let backend = Arc::new(MemoryStorage::new());
    let tab_a = StoreContext::open(Arc::clone(&backend)).await;
    let tab_b = StoreContext::open(Arc::clone(&backend)).await;
    let tab_c = StoreContext::open(backend).await;

    let mut rx_b = tab_b.cart().watch();
    let mut rx_c = tab_c.cart().watch();
    rx_b.borrow_and_update();
    rx_c.borrow_and_update();

    tab_a.cart().add_to_cart(variant_item(7, "M", "red", 10000)).await;

    wait_changed(&mut rx_b).await;
    wait_changed(&mut rx_c).await;
    assert_eq!(tab_b.cart().items(), tab_a.cart().items());
    assert_eq!(tab_c.cart().count(), 1);
}

#[tokio::test]
async fn test_foreign_wishlist_write_converges_other_tabs() {
    let backend = Arc::new(MemoryStorage::new());
    let tab_a = StoreContext::open(Arc::clone(&backend)).await;
    let tab_b = StoreContext::open(backend).await;

    let mut rx_b = tab_b.wishlist().watch();
    rx_b.borrow_and_update();

    tab_a.wishlist().add(saved_product(12, 1200)).await;

    wait_changed(&mut rx_b).await;
    let items = tab_b.wishlist().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().id, ProductId::new(12));
}

#[tokio::test]
async fn test_cart_write_does_not_disturb_wishlist() {
    let backend = Arc::new(MemoryStorage::new());
    let tab_a = StoreContext::open(Arc::clone(&backend)).await;
    let tab_b = StoreContext::open(backend).await;

    tab_b.wishlist().add(saved_product(5, 900)).await;
    let mut rx_b = tab_b.wishlist().watch();
    rx_b.borrow_and_update();

    tab_a.cart().add_to_cart(variant_item(7, "M", "red", 10000)).await;

    // The cart event is keyed "cart"; the wishlist store must not reload.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!rx_b.has_changed().unwrap());
    assert_eq!(tab_b.wishlist().items().len(), 1);
}

// =============================================================================
// Last-writer-wins
// =============================================================================

#[tokio::test]
async fn test_concurrent_writes_resolve_last_writer_wins() {
    // Two stores without sync tasks: both mutate from the same (empty)
    // snapshot, so neither sees the other's line. The later save wins
    // wholesale at the storage layer; there is no merge.
    let backend = Arc::new(MemoryStorage::new());
    let store_a =
        CartStore::open(PersistenceAdapter::new(Arc::clone(&backend))).await;
    let store_b =
        CartStore::open(PersistenceAdapter::new(Arc::clone(&backend))).await;

    store_a.add_to_cart(variant_item(1, "M", "red", 1000)).await;
    store_b.add_to_cart(variant_item(2, "L", "blue", 2000)).await;

    let raw = backend.read(CART_KEY).await.unwrap().unwrap();
    let persisted: Vec<CartLineItem> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted.first().unwrap().id.as_str(), "2-L-blue");

    // The earlier writer converges once it reloads; its own line is gone.
    store_a.reload().await;
    assert_eq!(store_a.items(), store_b.items());
}

#[tokio::test]
async fn test_closed_tab_stops_syncing() {
    let backend = Arc::new(MemoryStorage::new());
    let tab_a = StoreContext::open(Arc::clone(&backend)).await;
    let tab_b = StoreContext::open(Arc::clone(&backend)).await;

    // Closing tab B aborts its sync tasks; its store handles are gone, and
    // later writes from A must not panic or leak reloads anywhere.
    drop(tab_b);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    tab_a.cart().add_to_cart(variant_item(9, "S", "green", 700)).await;
    assert_eq!(tab_a.cart().count(), 1);

    // A fresh tab still hydrates from the persisted state.
    let tab_c = StoreContext::open(backend).await;
    assert_eq!(tab_c.cart().items(), tab_a.cart().items());
}
