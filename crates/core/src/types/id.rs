//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Line items get a
//! dedicated string-backed [`LineItemId`] because their identity is derived
//! from the product plus its selected variant, not from a catalog row.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use seagrape_core::define_id;
/// define_id!(ProductId);
/// define_id!(CollectionId);
///
/// let product_id = ProductId::new(1);
/// let collection_id = CollectionId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = collection_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);

/// Identity of one cart line.
///
/// A line item is one row in the cart, identified by the product *and* the
/// selected variant (size/color). The same product in two sizes occupies two
/// distinct lines, so this is not the catalog [`ProductId`].
///
/// The canonical form is derived via [`LineItemId::for_variant`]: the product
/// id followed by a `-{size}` and a `-{color}` segment for whichever variant
/// parts are present (`7-M-red`, `7-M`, `7`). Stores derive ids themselves;
/// callers never construct one when adding a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Derive the canonical line identity for a product variant.
    #[must_use]
    pub fn for_variant(
        product_id: ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Self {
        let mut id = product_id.to_string();
        for part in [size, color].into_iter().flatten() {
            id.push('-');
            id.push_str(part);
        }
        Self(id)
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ::core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LineItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<LineItemId> for String {
    fn from(id: LineItemId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_id_full_variant() {
        let id = LineItemId::for_variant(ProductId::new(7), Some("M"), Some("red"));
        assert_eq!(id.as_str(), "7-M-red");
    }

    #[test]
    fn test_line_item_id_size_only() {
        let id = LineItemId::for_variant(ProductId::new(7), Some("M"), None);
        assert_eq!(id.as_str(), "7-M");
    }

    #[test]
    fn test_line_item_id_no_variant() {
        let id = LineItemId::for_variant(ProductId::new(7), None, None);
        assert_eq!(id.as_str(), "7");
    }

    #[test]
    fn test_line_item_id_serde_transparent() {
        let id = LineItemId::for_variant(ProductId::new(3), None, Some("blue"));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"3-blue\"");
        let back: LineItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
