//! The persistent key-value store that holds transactions and settings.
//!
//! Every value is a string. Structured values (`transactions`, `exchangeRateCache`) are JSON.
//! Reads through [`read_string`] and [`read_json`] never fail: a missing key, an unreadable file or
//! malformed JSON all come back as `None` so that the caller can fall back to a default.

mod file;
mod memory;

use crate::error::Error;
use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::warn;

pub use file::FileStore;
pub use memory::MemoryStore;

/// JSON array of transaction records.
pub const TRANSACTIONS: &str = "transactions";
/// ISO date on which the user started saving.
pub const START_DATE: &str = "startDate";
/// The daily savings target in USD, as a stringified integer.
pub const DAILY_TARGET_USD: &str = "dailyTargetUSD";
pub const USER_NAME: &str = "userName";
/// JSON `{"rate": number, "timestamp": epoch-millis}`.
pub const EXCHANGE_RATE_CACHE: &str = "exchangeRateCache";
/// One of `daily`, `monthly` or `yearly`.
pub const TRANSACTION_VIEW: &str = "transactionView";

/// A string-to-string store. Writes replace the whole value for a key.
pub trait KeyValueStore: Debug + Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads `key`, logging and swallowing any error.
pub(crate) fn read_string(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Unable to read '{key}' from storage, using the default: {e:#}");
            None
        }
    }
}

/// Reads and parses the JSON stored at `key`. Malformed JSON is logged and treated as missing.
pub(crate) fn read_json<T>(store: &dyn KeyValueStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let raw = read_string(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            let error = Error::StorageParse {
                key: key.to_string(),
                message: e.to_string(),
            };
            warn!("{error}, using the default");
            None
        }
    }
}

/// Serializes `value` as JSON and writes it to `key`.
pub(crate) fn write_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).with_context(|| format!("Unable to serialize '{key}'"))?;
    store
        .set(key, &json)
        .with_context(|| format!("Unable to write '{key}' to storage"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Cache {
        rate: f64,
        timestamp: i64,
    }

    #[test]
    fn test_read_json_missing_key() {
        let store = MemoryStore::default();
        assert_eq!(read_json::<Cache>(&store, EXCHANGE_RATE_CACHE), None);
    }

    #[test]
    fn test_read_json_malformed() {
        let store = MemoryStore::default();
        store.set(EXCHANGE_RATE_CACHE, "{rate: oops").unwrap();
        assert_eq!(read_json::<Cache>(&store, EXCHANGE_RATE_CACHE), None);
        store.set(EXCHANGE_RATE_CACHE, "null").unwrap();
        assert_eq!(read_json::<Cache>(&store, EXCHANGE_RATE_CACHE), None);
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::default();
        let cache = Cache {
            rate: 15500.5,
            timestamp: 1_700_000_000_000,
        };
        write_json(&store, EXCHANGE_RATE_CACHE, &cache).unwrap();
        assert_eq!(read_json::<Cache>(&store, EXCHANGE_RATE_CACHE), Some(cache));
    }
}
