//! Sources of the USD exchange rate.

mod exchange_rate_api;
mod offline;

use crate::Config;
use crate::Result;
use rust_decimal::Decimal;
use std::fmt::{Debug, Display, Formatter};
use tracing::debug;

pub use exchange_rate_api::ExchangeRateApi;
pub use offline::OfflineRate;

/// Set this environment variable (to anything non-empty) to run without network access.
pub const OFFLINE_ENV: &str = "SAVINGS_OFFLINE";

/// Fetches how much one USD is worth in the local currency.
#[async_trait::async_trait]
pub trait RateProvider: Debug + Send + Sync {
    async fn usd_rate(&self) -> Result<Decimal>;
}

/// Whether rates come from the network or from the offline provider.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Live,
    Offline,
}

impl Mode {
    /// `Offline` when `SAVINGS_OFFLINE` is set and non-empty, otherwise `Live`.
    pub fn from_env() -> Self {
        match std::env::var(OFFLINE_ENV) {
            Ok(s) if !s.is_empty() => Mode::Offline,
            _ => Mode::Live,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Live => f.write_str("live"),
            Mode::Offline => f.write_str("offline"),
        }
    }
}

/// Creates the rate provider for `mode`.
pub fn rate_provider(config: &Config, mode: Mode) -> Box<dyn RateProvider> {
    debug!("Using the {mode} exchange rate provider");
    match mode {
        Mode::Live => Box::new(ExchangeRateApi::new(
            config.exchange_rate_url(),
            config.currency(),
        )),
        Mode::Offline => Box::new(OfflineRate::new(config.fallback_rate())),
    }
}
