//! Derived, read-only views of the cart.

use crate::types::{CartLine, CartState};

/// Total number of units across all lines
#[must_use]
pub fn total_item_count(state: &CartState) -> u64 {
    state.items.iter().map(|line| u64::from(line.count)).sum()
}

/// Sum of `price × count` over all lines, unrounded
#[must_use]
pub fn total_price(state: &CartState) -> f64 {
    state.items.iter().map(line_subtotal).sum()
}

/// `price × count` for one line
#[must_use]
pub fn line_subtotal(line: &CartLine) -> f64 {
    line.price * f64::from(line.count)
}

/// Format an amount for display, e.g. `$12.34`
///
/// Rounding happens here only; totals keep full precision.
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}
