//! Point value precision helpers.
//!
//! CRITICAL: Never use floating-point for point calculations.
//! All point values are `rust_decimal::Decimal` carrying three fractional
//! digits, the precision of the movement column in the store.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits carried by every point value.
pub const POINTS_SCALE: u32 = 3;

/// Rounds a point value to the ledger precision.
///
/// Uses banker's rounding (round half to even) to avoid cumulative drift
/// across long movement histories.
#[must_use]
pub fn round_points(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(POINTS_SCALE, RoundingStrategy::MidpointNearestEven)
}
