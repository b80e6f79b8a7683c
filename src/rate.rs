//! The USD exchange rate with a time-limited cache in storage.
//!
//! A cached rate younger than the TTL is used as-is. Otherwise the provider is asked and a good
//! answer is cached. When the provider fails, the configured fallback rate is used and nothing is
//! cached, so the next call tries the provider again.

use crate::api::RateProvider;
use crate::error::Error;
use crate::model::decimal_from_f64;
use crate::storage::{self, KeyValueStore, EXCHANGE_RATE_CACHE};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The default lifetime of a cached rate.
pub const DEFAULT_CACHE_HOURS: u32 = 24;

/// What is stored under `exchangeRateCache`. `timestamp` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCache {
    pub rate: f64,
    pub timestamp: i64,
}

impl RateCache {
    /// The cached rate when it is younger than `ttl` at `now` and positive.
    fn fresh_rate(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Decimal> {
        let age = now.timestamp_millis().saturating_sub(self.timestamp);
        if age >= ttl.num_milliseconds() {
            return None;
        }
        decimal_from_f64(self.rate).filter(|rate| *rate > Decimal::ZERO)
    }
}

/// Where a rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Cache,
    Provider,
    Fallback,
}

serde_plain::derive_display_from_serialize!(RateSource);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rate {
    pub value: Decimal,
    pub source: RateSource,
}

/// Returns the cached rate if it is fresh, otherwise fetches and caches a new one.
pub async fn current_rate(
    store: &dyn KeyValueStore,
    provider: &dyn RateProvider,
    now: DateTime<Utc>,
    ttl: Duration,
    fallback: Decimal,
) -> Rate {
    let cached = storage::read_json::<RateCache>(store, EXCHANGE_RATE_CACHE)
        .and_then(|cache| cache.fresh_rate(now, ttl));
    if let Some(value) = cached {
        debug!("Using the cached exchange rate {value}");
        return Rate {
            value,
            source: RateSource::Cache,
        };
    }
    refresh_rate(store, provider, now, fallback).await
}

/// Asks the provider for a rate regardless of the cache.
pub async fn refresh_rate(
    store: &dyn KeyValueStore,
    provider: &dyn RateProvider,
    now: DateTime<Utc>,
    fallback: Decimal,
) -> Rate {
    let fetched = match provider.usd_rate().await {
        Ok(rate) if rate > Decimal::ZERO => Ok(rate),
        Ok(rate) => Err(Error::Network(format!("received a non-positive rate {rate}"))),
        Err(e) => Err(Error::Network(format!("{e:#}"))),
    };

    match fetched {
        Ok(value) => {
            debug!("Fetched the exchange rate {value}");
            save(store, value, now);
            Rate {
                value,
                source: RateSource::Provider,
            }
        }
        Err(e) => {
            warn!("{e}, using the fallback rate {fallback}");
            Rate {
                value: fallback,
                source: RateSource::Fallback,
            }
        }
    }
}

fn save(store: &dyn KeyValueStore, rate: Decimal, now: DateTime<Utc>) {
    let Some(rate) = rate.to_f64() else {
        warn!("Unable to cache the exchange rate {rate}");
        return;
    };
    let cache = RateCache {
        rate,
        timestamp: now.timestamp_millis(),
    };
    if let Err(e) = storage::write_json(store, EXCHANGE_RATE_CACHE, &cache) {
        warn!("Unable to cache the exchange rate: {e:#}");
    }
}
