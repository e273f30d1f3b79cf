//! Scope resolution for filtered queries.
//!
//! Every scoped operation funnels its filters through `resolve_scope` before
//! touching the store: elevated callers keep their filters as-is, standard
//! callers are pinned to their own account, and a filter that points at
//! somebody else is rejected outright rather than silently narrowed.

use super::{AuthError, Principal};

/// Optional account filters for scoped operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    /// Restrict to one department.
    pub department: Option<String>,
    /// Restrict to one email identity.
    pub email: Option<String>,
}

impl AccountFilter {
    /// Filter matching a single email identity.
    #[must_use]
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            department: None,
            email: Some(email.into()),
        }
    }

    /// Filter matching a single department.
    #[must_use]
    pub fn by_department(department: impl Into<String>) -> Self {
        Self {
            department: Some(department.into()),
            email: None,
        }
    }

    /// Drops unset and blank filter values.
    #[must_use]
    pub fn normalized(self) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            department: non_blank(self.department),
            email: non_blank(self.email),
        }
    }
}

/// Applies the scope rule to a caller's requested filters.
///
/// Elevated principals may filter by any department or email. Standard
/// principals are always scoped to exactly their own account; requesting a
/// foreign email or department fails with `ScopeViolation`. Filters naming
/// the caller's own identity are permitted since they do not widen scope.
///
/// # Errors
///
/// Returns `AuthError::ScopeViolation` when a standard principal requests a
/// filter outside their own account.
pub fn resolve_scope(
    principal: &Principal,
    filter: AccountFilter,
) -> Result<AccountFilter, AuthError> {
    let filter = filter.normalized();

    if principal.is_elevated() {
        return Ok(filter);
    }

    if let Some(department) = &filter.department
        && department != &principal.department
    {
        return Err(AuthError::ScopeViolation(format!(
            "cannot filter by department '{department}'"
        )));
    }

    if let Some(email) = &filter.email
        && email != &principal.email
    {
        return Err(AuthError::ScopeViolation(format!(
            "cannot filter by email '{email}'"
        )));
    }

    // Standard callers always resolve to their own account only.
    Ok(AccountFilter::by_email(principal.email.clone()))
}
