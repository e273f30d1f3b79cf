//! Repository abstractions for data access.

pub mod account;
pub mod credential;

pub use account::{AccountRepository, NewAccount, ProfileUpdate};
pub use credential::CredentialRepository;

use sea_orm::DbErr;
use thiserror::Error;

use kudos_shared::AppError;

/// Error types for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(uuid::Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(id) => Self::NotFound(format!("account {id}")),
            StoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}
