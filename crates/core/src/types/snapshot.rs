//! Wishlist product snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product saved to the wishlist.
///
/// A snapshot of the catalog entry at the moment it was saved, not a live
/// reference: the title/price/image here may drift from the catalog, which
/// is acceptable for a wishlist. Deduplicated by `id` within a wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProduct {
    /// Catalog product id.
    pub id: ProductId,
    /// Product title at save time.
    pub title: String,
    /// Unit price at save time.
    pub price: Decimal,
    /// Product image reference.
    pub image: Option<String>,
    /// When the product was saved.
    pub added_at: DateTime<Utc>,
}

impl SavedProduct {
    /// Snapshot a product as of now.
    #[must_use]
    pub fn new(id: ProductId, title: String, price: Decimal, image: Option<String>) -> Self {
        Self {
            id,
            title,
            price,
            image,
            added_at: Utc::now(),
        }
    }
}
