//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use kudos_shared::AppError;

/// Errors produced by ledger validation.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No accounts matched the target filter.
    #[error("no matching accounts")]
    NotFound,

    /// The caller's balance does not cover the batch.
    #[error("insufficient balance: need {required}, have {available}")]
    InsufficientBalance {
        /// Points required to fund the batch.
        required: Decimal,
        /// Points available to the caller.
        available: Decimal,
    },

    /// Transfer addressed to the caller's own account.
    #[error("cannot transfer points to yourself")]
    SelfTransfer,

    /// Transfer value must be strictly positive.
    #[error("transfer value must be positive, got {0}")]
    NonPositiveTransfer(Decimal),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound => Self::NotFound("no matching accounts".to_string()),
            LedgerError::InsufficientBalance {
                required,
                available,
            } => Self::InsufficientBalance {
                required,
                available,
            },
            LedgerError::SelfTransfer => Self::SelfTransfer,
            LedgerError::NonPositiveTransfer(value) => Self::NonPositiveTransfer(value),
        }
    }
}
