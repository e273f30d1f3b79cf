//! Exchange rate model and lookup seam.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

/// The base reporting currency. Conversions out of it are the identity.
pub const BASE_CURRENCY: &str = "USD";

/// One resolved exchange rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rate {
    /// Currency code this rate converts from.
    pub code: String,
    /// Units of the target currency per base unit.
    pub value: Decimal,
    /// True when the lookup failed and the zero-rate fallback was applied.
    pub degraded: bool,
}

impl Rate {
    /// The identity rate for the base currency.
    #[must_use]
    pub fn base() -> Self {
        Self {
            code: BASE_CURRENCY.to_string(),
            value: Decimal::ONE,
            degraded: false,
        }
    }

    /// A successfully resolved rate.
    #[must_use]
    pub fn resolved(code: impl Into<String>, value: Decimal) -> Self {
        Self {
            code: code.into(),
            value,
            degraded: false,
        }
    }

    /// The zero-rate fallback for a failed lookup.
    ///
    /// Degraded rates keep the read alive: the affected rows convert to
    /// zero and carry the marker instead of failing the whole listing.
    #[must_use]
    pub fn degraded(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: Decimal::ZERO,
            degraded: true,
        }
    }
}

/// External exchange-rate collaborator.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Looks up the rate for one currency code against the base currency.
    ///
    /// `None` means the collaborator failed or returned an unrecognized
    /// shape; the caller degrades to the zero rate.
    async fn rate_for(&self, code: &str) -> Option<Decimal>;

    /// Resolves rates for a batch of currency codes.
    ///
    /// The base currency short-circuits to the identity rate without
    /// touching the collaborator; every failed lookup degrades instead of
    /// failing the batch.
    async fn resolve_rates(&self, codes: &[String]) -> Vec<Rate> {
        let mut rates = Vec::with_capacity(codes.len());
        for code in codes {
            if code == BASE_CURRENCY {
                rates.push(Rate::base());
            } else {
                match self.rate_for(code).await {
                    Some(value) => rates.push(Rate::resolved(code.clone(), value)),
                    None => rates.push(Rate::degraded(code.clone())),
                }
            }
        }
        rates
    }
}

/// Fixed rate table, for tests and offline runs.
#[derive(Debug, Default, Clone)]
pub struct StaticRates {
    entries: std::collections::HashMap<String, Decimal>,
}

impl StaticRates {
    /// Builds a table from `(code, rate)` pairs.
    #[must_use]
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Decimal)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl RateSource for StaticRates {
    async fn rate_for(&self, code: &str) -> Option<Decimal> {
        self.entries.get(code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_base_currency_is_identity() {
        let source = StaticRates::default();
        let rates = source.resolve_rates(&["USD".to_string()]).await;

        assert_eq!(rates, vec![Rate::base()]);
    }

    #[tokio::test]
    async fn test_unknown_currency_degrades_to_zero() {
        let source = StaticRates::default();
        let rates = source.resolve_rates(&["XYZ".to_string()]).await;

        assert_eq!(rates.len(), 1);
        assert!(rates[0].degraded);
        assert_eq!(rates[0].value, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_known_currency_resolves() {
        let source = StaticRates::new([("BRL".to_string(), dec!(5.25))]);
        let rates = source
            .resolve_rates(&["BRL".to_string(), "USD".to_string()])
            .await;

        assert_eq!(rates[0], Rate::resolved("BRL", dec!(5.25)));
        assert_eq!(rates[1], Rate::base());
    }
}
