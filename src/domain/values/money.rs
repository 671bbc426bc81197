//! Currency and count rounding shared by the heuristics.
//!
//! All money is carried as [`Decimal`] so that `10.00 × 1.15` is exactly
//! `11.50`. Rounding is to cents with midpoints away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole, non-negative count. Negative inputs collapse to zero.
pub fn round_count(value: Decimal) -> u64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

/// Percent change from `prior` to `recent`.
///
/// Returns `None` when there is no positive baseline to compare against.
pub fn percent_change(recent: Decimal, prior: Decimal) -> Option<Decimal> {
    if prior <= Decimal::ZERO {
        return None;
    }
    Some((recent - prior) / prior * Decimal::from(100))
}
