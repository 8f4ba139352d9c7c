//! Integration tests for Seagrape.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p seagrape-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Disk-backed persistence, corruption recovery,
//!   legacy cart migration
//! - `cross_tab_sync` - Multi-context convergence and last-writer-wins
//!
//! The suites open several store contexts on one shared backend, the way
//! several browser tabs share one storage origin.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::watch;

use seagrape_core::{NewCartItem, ProductId, SavedProduct};

/// Await the next change on a watch channel.
///
/// # Panics
///
/// Panics if no change arrives within two seconds or the channel closes;
/// either means the store under test failed to propagate an update.
pub async fn wait_changed<T>(rx: &mut watch::Receiver<T>) {
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("timed out waiting for a state change")
        .expect("state channel closed");
}

/// A cart item for a sized/colored product, priced in cents.
#[must_use]
pub fn variant_item(product_id: i32, size: &str, color: &str, cents: i64) -> NewCartItem {
    NewCartItem {
        product_id: ProductId::new(product_id),
        title: format!("Product {product_id}"),
        price: Decimal::new(cents, 2),
        image: Some(format!("/img/{product_id}.jpg")),
        size: Some(size.to_string()),
        color: Some(color.to_string()),
    }
}

/// A wishlist snapshot, priced in cents.
#[must_use]
pub fn saved_product(product_id: i32, cents: i64) -> SavedProduct {
    SavedProduct::new(
        ProductId::new(product_id),
        format!("Product {product_id}"),
        Decimal::new(cents, 2),
        None,
    )
}
