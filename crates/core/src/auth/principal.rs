//! The authenticated caller for one logical session.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Capability;

/// The authenticated caller context.
///
/// Built once by the authorization gate and passed explicitly into every
/// engine operation. The balance and last-movement fields are a snapshot
/// taken at authentication time so operations do not re-query the store for
/// the caller's own state.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Account id of the caller.
    pub account_id: Uuid,
    /// Email identity of the caller.
    pub email: String,
    /// Department of the caller, used for own-scope filter checks.
    pub department: String,
    /// Native currency of the caller's account.
    pub currency: String,
    /// Privilege tier resolved from the role at authentication time.
    pub capability: Capability,
    /// Balance snapshot read when the principal was resolved.
    pub balance: Decimal,
    /// Timestamp of the caller's most recent movement, if any.
    pub last_movement: Option<DateTime<Utc>>,
}

impl Principal {
    /// Returns true if the caller holds the elevated capability.
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        self.capability.is_elevated()
    }
}
