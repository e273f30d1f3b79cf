//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every public operation fails with exactly one of these variants, so a
/// caller can always tell an authorization failure apart from a validation
/// failure or a storage fault.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed email address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Identity or secret missing from the environment.
    #[error("Credentials are required: {0}")]
    MissingCredentials(String),

    /// No account matches the presented identity.
    #[error("Unknown identity: {0}")]
    UnknownIdentity(String),

    /// The secret does not match the stored credential.
    #[error("Authentication failed")]
    BadSecret,

    /// Filter outside the caller's permitted scope.
    #[error("Scope violation: {0}")]
    ScopeViolation(String),

    /// Operation requires the elevated capability.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// No matching accounts.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller's balance does not cover the requested mutation.
    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance {
        /// Points required by the operation.
        required: rust_decimal::Decimal,
        /// Points available to the caller.
        available: rust_decimal::Decimal,
    },

    /// Transfer addressed to the caller's own account.
    #[error("Cannot transfer points to yourself")]
    SelfTransfer,

    /// Transfer value must be strictly positive.
    #[error("Transfer value must be positive, got {0}")]
    NonPositiveTransfer(rust_decimal::Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::MissingCredentials(_) => "MISSING_CREDENTIALS",
            Self::UnknownIdentity(_) => "UNKNOWN_IDENTITY",
            Self::BadSecret => "BAD_SECRET",
            Self::ScopeViolation(_) => "SCOPE_VIOLATION",
            Self::NotAuthorized(_) => "NOT_AUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::NonPositiveTransfer(_) => "NON_POSITIVE_TRANSFER",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for failures caused by the caller rather than the system.
    #[must_use]
    pub const fn is_caller_fault(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::ExternalService(_) | Self::Internal(_)
        )
    }
}
