//! Transaction engine for the rewards ledger.
//!
//! This crate wires the authorization gate, the account store, the exchange
//! rate collaborator, and the welcome notifier into the public operation
//! surface: load, read, add, remove, transfer, and movements.

pub mod engine;
pub mod gate;
pub mod notify;
pub mod rates;
pub mod types;

pub use engine::Engine;
pub use gate::{AuthGate, Caller};
pub use notify::{EmailNotifier, LogNotifier, Notifier};
pub use rates::HttpRateSource;
pub use types::{AccountRow, LoadRow, LoadedAccount, MovementRow, TransferReceipt};
