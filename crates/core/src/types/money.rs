//! Money formatting helpers.
//!
//! Prices are plain [`Decimal`] amounts in the store's single display
//! currency. Formatting is the only money concern this crate owns; arithmetic
//! happens wherever the amounts live.

use rust_decimal::Decimal;

/// Format a decimal amount as a display price string (e.g., "$19.99").
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2}")
}
