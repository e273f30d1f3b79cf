//! Ledger service for mutation validation.
//!
//! Pure business rules with no store dependencies: the engine resolves the
//! target set and the caller's snapshot, this service decides whether the
//! mutation is allowed and what it will cost.

use rust_decimal::Decimal;

use kudos_shared::types::points::round_points;

use crate::auth::Principal;

use super::error::LedgerError;

/// Validated plan for a batch point adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    /// Points appended to every target account.
    pub per_target: Decimal,
    /// Sum across all targets.
    pub total: Decimal,
    /// Counter-debit appended to the caller's account per target, if the
    /// caller funds the batch from their own balance.
    pub counter_debit: Option<Decimal>,
}

/// Ledger service for mutation validation.
pub struct LedgerService;

impl LedgerService {
    /// Validates a batch add/remove against the caller's snapshot.
    ///
    /// Elevated callers mint freely. Standard callers fund the batch from
    /// their own balance: the total must not exceed it, and each target
    /// grant is paired with a counter-debit of the same magnitude on the
    /// caller's account.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the target set is empty, or
    /// `LedgerError::InsufficientBalance` if a standard caller cannot cover
    /// the total.
    pub fn plan_batch(
        value: Decimal,
        target_count: usize,
        principal: &Principal,
    ) -> Result<BatchPlan, LedgerError> {
        if target_count == 0 {
            return Err(LedgerError::NotFound);
        }

        let per_target = round_points(value);
        let total = round_points(per_target * Decimal::from(target_count));

        if !principal.is_elevated() && principal.balance < total {
            return Err(LedgerError::InsufficientBalance {
                required: total,
                available: principal.balance,
            });
        }

        let counter_debit = if principal.is_elevated() {
            None
        } else {
            Some(-per_target.abs())
        };

        Ok(BatchPlan {
            per_target,
            total,
            counter_debit,
        })
    }

    /// Validates a peer-to-peer transfer against the caller's snapshot.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NonPositiveTransfer` for a zero or negative
    /// value, `LedgerError::SelfTransfer` when the recipient is the caller,
    /// or `LedgerError::InsufficientBalance` when the value exceeds the
    /// caller's balance.
    pub fn validate_transfer(
        value: Decimal,
        to_email: &str,
        principal: &Principal,
    ) -> Result<Decimal, LedgerError> {
        let value = round_points(value);

        if value <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveTransfer(value));
        }

        if to_email == principal.email {
            return Err(LedgerError::SelfTransfer);
        }

        if value > principal.balance {
            return Err(LedgerError::InsufficientBalance {
                required: value,
                available: principal.balance,
            });
        }

        Ok(value)
    }
}
