//! Property tests for balance derivation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::derive_balance;

/// Movement values within the ledger's practical range, at ledger scale.
fn movement_value() -> impl Strategy<Value = Decimal> {
    (-1_000_000_i64..1_000_000_i64).prop_map(|raw| Decimal::new(raw, 3))
}

proptest! {
    /// Appending one movement shifts the balance by exactly that value.
    #[test]
    fn prop_append_shifts_balance_by_value(
        history in proptest::collection::vec(movement_value(), 0..50),
        next in movement_value(),
    ) {
        let before = derive_balance(history.clone());
        let mut appended = history;
        appended.push(next);
        let after = derive_balance(appended);

        prop_assert_eq!(after, before + next);
    }

    /// Derivation is order independent.
    #[test]
    fn prop_order_independent(
        mut history in proptest::collection::vec(movement_value(), 0..50),
    ) {
        let forward = derive_balance(history.clone());
        history.reverse();
        let backward = derive_balance(history);

        prop_assert_eq!(forward, backward);
    }

    /// A matched pair of movements nets to zero.
    #[test]
    fn prop_matched_pair_nets_zero(value in movement_value()) {
        prop_assert_eq!(derive_balance([value, -value]), Decimal::ZERO);
    }
}
