//! Reporting-currency conversion.
//!
//! Balances are held in points tagged with the account's native currency;
//! reads also report a converted value against external exchange rates.
//! Rate lookup is a collaborator behind the `RateSource` trait so the
//! engine can plug in an HTTP client and tests can use a static table.

mod conversion;
mod rate;

pub use conversion::convert;
pub use rate::{BASE_CURRENCY, Rate, RateSource, StaticRates};
