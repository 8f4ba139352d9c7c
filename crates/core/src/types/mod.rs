//! Core types for Seagrape.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod line_item;
pub mod money;
pub mod snapshot;

pub use id::*;
pub use line_item::{CartLineItem, NewCartItem};
pub use money::format_amount;
pub use snapshot::SavedProduct;
