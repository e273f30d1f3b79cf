//! Balance derivation from movement histories.

use rust_decimal::Decimal;

use kudos_shared::types::points::round_points;

use crate::auth::Capability;

/// Initial grant for accounts created with the elevated capability.
///
/// Managers start lower because they accrue through redistribution.
pub const INITIAL_GRANT_ELEVATED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Initial grant for all other accounts.
pub const INITIAL_GRANT_STANDARD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Derives a balance from a movement history.
///
/// The balance is exactly the sum of the movement values, at ledger
/// precision. An empty history derives to zero, though accounts are never
/// created without their initial grant movement.
#[must_use]
pub fn derive_balance<I>(movement_values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_points(movement_values.into_iter().sum())
}

/// Returns the initial grant for a freshly created account.
#[must_use]
pub const fn initial_grant(capability: Capability) -> Decimal {
    match capability {
        Capability::Elevated => INITIAL_GRANT_ELEVATED,
        Capability::Standard => INITIAL_GRANT_STANDARD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_history_is_zero() {
        assert_eq!(derive_balance([]), Decimal::ZERO);
    }

    #[test]
    fn test_sum_of_signed_movements() {
        let history = [dec!(500), dec!(-30), dec!(12.345)];
        assert_eq!(derive_balance(history), dec!(482.345));
    }

    #[test]
    fn test_initial_grants() {
        assert_eq!(initial_grant(Capability::Elevated), dec!(100));
        assert_eq!(initial_grant(Capability::Standard), dec!(500));
    }
}
