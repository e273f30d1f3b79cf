//! Conversion of native point values into the reporting currency.

use rust_decimal::Decimal;

use kudos_shared::types::points::round_points;

use super::rate::Rate;

/// Converts a native value using a resolved rate.
///
/// Degraded rates carry value zero, so affected rows convert to zero
/// rather than aborting the listing.
#[must_use]
pub fn convert(native_value: Decimal, rate: &Rate) -> Decimal {
    round_points(native_value * rate.value)
}
