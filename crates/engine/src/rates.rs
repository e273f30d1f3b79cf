//! HTTP exchange-rate collaborator.
//!
//! Quotes come from a currency API whose endpoint carries a `{currency}`
//! placeholder and answers with one keyed quote object per pair, e.g.
//! `{"USDBRL": {"high": "5.25"}}`. Every failure path resolves to `None`;
//! the caller degrades the affected rows instead of aborting the read.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use kudos_core::currency::{BASE_CURRENCY, RateSource};
use kudos_shared::config::ExchangeConfig;

#[derive(Debug, Deserialize)]
struct Quote {
    high: String,
}

/// Rate source backed by an HTTP quote API.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    url_template: String,
}

impl HttpRateSource {
    /// Builds a client from the exchange configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ExchangeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url_template: config.api_base_url.clone(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn rate_for(&self, code: &str) -> Option<Decimal> {
        let url = self.url_template.replace("{currency}", code);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(currency = code, error = %e, "rate lookup request failed");
                return None;
            }
        };

        let quotes: HashMap<String, Quote> = match response.json().await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!(currency = code, error = %e, "rate response had unexpected shape");
                return None;
            }
        };

        let key = format!("{BASE_CURRENCY}{code}");
        let rate = quotes.get(&key).and_then(|quote| quote.high.parse().ok());
        if rate.is_none() {
            tracing::warn!(currency = code, "no usable quote in rate response");
        }
        rate
    }
}
