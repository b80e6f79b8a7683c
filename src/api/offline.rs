//! Implements `RateProvider` without the network.
//!
//! Note: this is compiled even in the "production" version of the app so that the whole program
//! can be run, top-to-bottom, without access to the exchange rate service.

use crate::api::RateProvider;
use crate::Result;
use anyhow::anyhow;
use rust_decimal::Decimal;

/// Always answers with the same rate, or always fails when built with `failing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfflineRate {
    rate: Option<Decimal>,
}

impl OfflineRate {
    pub fn new(rate: Decimal) -> Self {
        Self { rate: Some(rate) }
    }

    /// A provider whose every request fails, as though the network were down.
    pub fn failing() -> Self {
        Self { rate: None }
    }
}

#[async_trait::async_trait]
impl RateProvider for OfflineRate {
    async fn usd_rate(&self) -> Result<Decimal> {
        self.rate
            .ok_or_else(|| anyhow!("the offline rate provider is set to fail"))
    }
}
