//! Cart line item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{LineItemId, ProductId};

/// One row in the cart.
///
/// Identified by product plus selected variant (size/color), carrying its own
/// quantity. Two invariants hold for every cart: no two lines share an `id`,
/// and `quantity` is at least 1 (a mutation that would drop it below 1
/// removes the line instead).
///
/// This is also the persisted shape: carts serialize as a JSON array of
/// these, and the array must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Line identity, derived from `(product_id, size, color)`.
    pub id: LineItemId,
    /// Catalog product id.
    pub product_id: ProductId,
    /// Product title.
    pub title: String,
    /// Unit price (non-negative).
    pub price: Decimal,
    /// Product image reference.
    pub image: Option<String>,
    /// Quantity (>= 1).
    pub quantity: u32,
    /// Selected size, if the product has sizes.
    pub size: Option<String>,
    /// Selected color, if the product has colors.
    pub color: Option<String>,
}

impl CartLineItem {
    /// The canonical id for this line's product/variant combination.
    ///
    /// Equal to `self.id` for lines written by this store. Persisted carts
    /// from older clients may carry a bare catalog id; the load path uses
    /// this to re-derive and normalize them.
    #[must_use]
    pub fn derived_id(&self) -> LineItemId {
        LineItemId::for_variant(self.product_id, self.size.as_deref(), self.color.as_deref())
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Input for adding a line to the cart.
///
/// Carries no id and no quantity: the store derives the line identity itself
/// and an add always contributes exactly one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Catalog product id.
    pub product_id: ProductId,
    /// Product title.
    pub title: String,
    /// Unit price.
    pub price: Decimal,
    /// Product image reference.
    pub image: Option<String>,
    /// Selected size.
    pub size: Option<String>,
    /// Selected color.
    pub color: Option<String>,
}

impl NewCartItem {
    /// The line identity this item resolves to.
    #[must_use]
    pub fn line_item_id(&self) -> LineItemId {
        LineItemId::for_variant(self.product_id, self.size.as_deref(), self.color.as_deref())
    }

    /// Build the initial cart line for this item with `quantity = 1`.
    #[must_use]
    pub fn into_line_item(self) -> CartLineItem {
        let id = self.line_item_id();
        CartLineItem {
            id,
            product_id: self.product_id,
            title: self.title,
            price: self.price,
            image: self.image,
            quantity: 1,
            size: self.size,
            color: self.color,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee_shirt() -> NewCartItem {
        NewCartItem {
            product_id: ProductId::new(7),
            title: "Box Logo Tee".to_string(),
            price: Decimal::new(10000, 2),
            image: Some("/img/tee.jpg".to_string()),
            size: Some("M".to_string()),
            color: Some("red".to_string()),
        }
    }

    #[test]
    fn test_into_line_item_starts_at_one() {
        let line = tee_shirt().into_line_item();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.id.as_str(), "7-M-red");
    }

    #[test]
    fn test_line_total() {
        let mut line = tee_shirt().into_line_item();
        line.quantity = 5;
        assert_eq!(line.line_total(), Decimal::new(50000, 2));
    }

    #[test]
    fn test_derived_id_matches_for_canonical_line() {
        let line = tee_shirt().into_line_item();
        assert_eq!(line.derived_id(), line.id);
    }

    #[test]
    fn test_persisted_shape_round_trips() {
        let line = tee_shirt().into_line_item();
        let json = serde_json::to_string(&vec![line.clone()]).unwrap();
        let back: Vec<CartLineItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![line]);
    }
}
