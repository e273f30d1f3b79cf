//! Shared value types.

pub mod email;
pub mod points;
