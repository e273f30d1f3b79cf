//! Input and output rows of the engine operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// One account row of bulk-load input.
#[derive(Debug, Clone)]
pub struct LoadRow {
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Role; the manager role confers the elevated capability.
    pub role: String,
    /// Email identity, validated before any write.
    pub email: String,
    /// Native currency code.
    pub currency: String,
}

/// Result row of a bulk load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedAccount {
    /// Email identity.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Role.
    pub role: String,
    /// Native currency code.
    pub currency: String,
    /// True if this row created the account, false if it updated one.
    pub created: bool,
}

/// One row of a scoped account listing.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRow {
    /// Email identity.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Department.
    pub department: String,
    /// Role.
    pub role: String,
    /// Native currency code.
    pub currency: String,
    /// Balance in points.
    pub balance: Decimal,
    /// Balance converted to the account's reporting currency.
    pub converted: Decimal,
    /// True when the rate lookup failed and the zero rate was applied.
    pub degraded: bool,
    /// Timestamp of the most recent movement, if any.
    pub last_movement: Option<DateTime<Utc>>,
}

/// One row of a movement history listing.
#[derive(Debug, Clone, Serialize)]
pub struct MovementRow {
    /// When the movement was appended.
    pub date: DateTime<Utc>,
    /// Signed point value.
    pub value: Decimal,
    /// Value converted to the caller's reporting currency.
    pub converted: Decimal,
    /// Identity that caused the movement.
    pub actor: String,
}

/// Outcome of a successful transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// Points moved.
    pub value: Decimal,
    /// Recipient identity.
    pub to_email: String,
    /// Sender balance after the transfer.
    pub remaining_balance: Decimal,
}
