//! Implements `RateProvider` against an exchangerate-api.com style endpoint.

use crate::api::RateProvider;
use crate::model::decimal_from_f64;
use crate::Result;
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::trace;

/// The body of a `latest/USD` response. Only the rates table is read.
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Fetches the latest USD rates over HTTP and picks out `currency`.
#[derive(Debug, Clone)]
pub struct ExchangeRateApi {
    client: reqwest::Client,
    url: String,
    currency: String,
}

impl ExchangeRateApi {
    pub fn new(url: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            currency: currency.into(),
        }
    }
}

#[async_trait::async_trait]
impl RateProvider for ExchangeRateApi {
    async fn usd_rate(&self) -> Result<Decimal> {
        trace!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to send exchange rate request to {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("Exchange rate request failed with status {status}: {body}");
        }

        let body = response
            .text()
            .await
            .context("Failed to read the exchange rate response")?;
        parse_rate(&body, &self.currency)
    }
}

/// Reads `rates.<currency>` from a response body and checks that it is a positive number.
fn parse_rate(body: &str, currency: &str) -> Result<Decimal> {
    let latest: LatestRates =
        serde_json::from_str(body).context("Failed to parse the exchange rate response")?;
    let rate = latest
        .rates
        .get(currency)
        .copied()
        .with_context(|| format!("The exchange rate response has no rate for {currency}"))?;
    match decimal_from_f64(rate) {
        Some(rate) if rate > Decimal::ZERO => Ok(rate),
        _ => bail!("The exchange rate for {currency} is not a positive number: {rate}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        let body = r#"{"base": "USD", "date": "2024-01-01", "rates": {"USD": 1, "IDR": 15482.5}}"#;
        assert_eq!(parse_rate(body, "IDR").unwrap(), Decimal::new(154825, 1));
    }

    #[test]
    fn test_parse_rate_missing_currency() {
        let body = r#"{"rates": {"USD": 1}}"#;
        let err = parse_rate(body, "IDR").unwrap_err();
        assert!(err.to_string().contains("no rate for IDR"));
    }

    #[test]
    fn test_parse_rate_rejects_bad_values() {
        assert!(parse_rate(r#"{"rates": {"IDR": 0}}"#, "IDR").is_err());
        assert!(parse_rate(r#"{"rates": {"IDR": -3.5}}"#, "IDR").is_err());
        assert!(parse_rate("<html>", "IDR").is_err());
    }
}
