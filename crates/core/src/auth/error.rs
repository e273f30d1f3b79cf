//! Authorization error types.

use thiserror::Error;

use kudos_shared::AppError;

use super::password::PasswordError;

/// Errors produced by authentication and scope resolution.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Identity or secret was not supplied.
    #[error("credentials are required: {0}")]
    MissingCredentials(String),

    /// No account matches the presented identity.
    #[error("unknown identity: {0}")]
    UnknownIdentity(String),

    /// The secret does not match the stored credential.
    #[error("secret does not match")]
    BadSecret,

    /// Filter outside the caller's permitted scope.
    #[error("scope violation: {0}")]
    ScopeViolation(String),

    /// Operation requires the elevated capability.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// Password hashing or verification failed.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials(msg) => Self::MissingCredentials(msg),
            AuthError::UnknownIdentity(identity) => Self::UnknownIdentity(identity),
            AuthError::BadSecret => Self::BadSecret,
            AuthError::ScopeViolation(msg) => Self::ScopeViolation(msg),
            AuthError::NotAuthorized(msg) => Self::NotAuthorized(msg),
            AuthError::Password(e) => Self::Internal(e.to_string()),
        }
    }
}
