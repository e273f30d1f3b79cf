//! Authorization rules and password hashing.
//!
//! This module provides:
//! - The `Capability` privilege tier carried on every `Principal`
//! - Scope resolution for filtered queries
//! - Password hashing with Argon2id

mod error;
mod password;
mod principal;
mod scope;

pub use error::AuthError;
pub use password::{PasswordError, generate_password, hash_password, verify_password};
pub use principal::Principal;
pub use scope::{AccountFilter, resolve_scope};

use serde::{Deserialize, Serialize};

/// Privilege tier of an authenticated caller.
///
/// Resolved exactly once, when the principal is built; call sites branch on
/// this value instead of re-inspecting the role string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Unrestricted scope: may load accounts, filter freely, and grant
    /// points without funding them.
    Elevated,
    /// Scoped to the caller's own account; grants are funded from the
    /// caller's balance.
    Standard,
}

/// The role value that confers the elevated capability.
const ELEVATED_ROLE: &str = "Manager";

impl Capability {
    /// Resolves the capability conferred by a role.
    ///
    /// Roles are free-form profile text; only the manager role elevates.
    #[must_use]
    pub fn from_role(role: &str) -> Self {
        if role == ELEVATED_ROLE {
            Self::Elevated
        } else {
            Self::Standard
        }
    }

    /// Returns true for the elevated tier.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Elevated)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Elevated => write!(f, "elevated"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_role_elevates() {
        assert_eq!(Capability::from_role("Manager"), Capability::Elevated);
        assert!(Capability::from_role("Manager").is_elevated());
    }

    #[test]
    fn test_other_roles_are_standard() {
        for role in ["Salesman", "Receptionist", "CEO", "manager", ""] {
            assert_eq!(Capability::from_role(role), Capability::Standard);
        }
    }
}
