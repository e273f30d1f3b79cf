//! `SeaORM` entity definitions.

pub mod accounts;
pub mod balances;
pub mod credentials;
pub mod movements;
