//! Ledger rules: balance derivation, initial grants, mutation validation.
//!
//! The ledger is append-only: an account's balance is nothing more than the
//! sum of its movement history. Everything in this module is pure; the
//! store-facing side lives in the repository layer.

mod balance;
mod error;
mod service;

#[cfg(test)]
mod balance_props;

pub use balance::{INITIAL_GRANT_ELEVATED, INITIAL_GRANT_STANDARD, derive_balance, initial_grant};
pub use error::LedgerError;
pub use service::{BatchPlan, LedgerService};
