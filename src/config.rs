//! Configuration file handling.
//!
//! The configuration file is stored at `$SAVINGS_HOME/config.json`. It holds the settings that
//! are not user data: the local currency, where exchange rates come from, and the timezone that
//! decides what "today" is. User data lives in the key-value store under `$SAVINGS_HOME/storage`.

use crate::model::{decimal_from_f64, Amount};
use crate::rate::DEFAULT_CACHE_HOURS;
use crate::storage::{FileStore, KeyValueStore};
use crate::target::DEFAULT_PROGRESS_CAP;
use crate::{utils, Result};
use anyhow::{bail, Context};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "savings";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORAGE: &str = "storage";
const DEFAULT_CURRENCY: &str = "IDR";
const DEFAULT_EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
const DEFAULT_FALLBACK_RATE: u32 = 15000;
/// Asia/Jakarta, which has no daylight saving time.
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 7 * 60;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SAVINGS_HOME` and from there it loads `$SAVINGS_HOME/config.json`. It also opens
/// the key-value store that holds the user's transactions and settings.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    storage_dir: PathBuf,
    config_file: ConfigFile,
    utc_offset: FixedOffset,
    store: Arc<dyn KeyValueStore>,
}

impl Config {
    /// Creates the data directory, its storage subdirectory and an initial `config.json` with
    /// default settings.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the savings home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let storage_dir = root.join(STORAGE);
        utils::make_dir(&storage_dir).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Self::new(root, config_path, storage_dir, config_file)
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load and validate the config file
    /// - open the storage directory, creating it if it has gone missing
    pub async fn load(savings_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = savings_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Savings home is missing, run 'savings init' first")?;
        let _ = utils::read_dir(&root)
            .await
            .context("Savings home is not readable")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'savings init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let storage_dir = root.join(STORAGE);
        utils::make_dir(&storage_dir).await?;

        Self::new(root, config_path, storage_dir, config_file)
    }

    /// Loads the configuration in `dir`, or creates it when there is no `config.json` yet.
    pub async fn load_or_create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.join(CONFIG_JSON).is_file() {
            Self::load(dir).await
        } else {
            Self::create(dir).await
        }
    }

    fn new(
        root: PathBuf,
        config_path: PathBuf,
        storage_dir: PathBuf,
        config_file: ConfigFile,
    ) -> Result<Self> {
        let utc_offset = config_file.utc_offset()?;
        let store = FileStore::open(&storage_dir)?;
        Ok(Self {
            root,
            config_path,
            storage_dir,
            config_file,
            utc_offset,
            store: Arc::new(store),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// The key-value store holding transactions and settings.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// The local currency code, e.g. `IDR`.
    pub fn currency(&self) -> &str {
        &self.config_file.currency
    }

    pub fn exchange_rate_url(&self) -> &str {
        &self.config_file.exchange_rate_url
    }

    /// The rate used when no rate can be fetched.
    pub fn fallback_rate(&self) -> Decimal {
        decimal_from_f64(self.config_file.fallback_rate)
            .unwrap_or_else(|| Decimal::from(DEFAULT_FALLBACK_RATE))
    }

    /// How long a fetched exchange rate is reused.
    pub fn rate_cache_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.config_file.rate_cache_hours))
    }

    /// The amount that shows as 100% on the progress bar.
    pub fn progress_cap(&self) -> Amount {
        Amount::new(Decimal::from(self.config_file.progress_cap))
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// The current date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.utc_offset).date_naive()
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "savings",
///   "config_version": 1,
///   "currency": "IDR",
///   "exchange_rate_url": "https://api.exchangerate-api.com/v4/latest/USD",
///   "fallback_rate": 15000,
///   "rate_cache_hours": 24,
///   "progress_cap": 1000000,
///   "utc_offset_minutes": 420
/// }
/// ```
///
/// Everything except `app_name` and `config_version` may be left out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "savings"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The currency that one USD is converted into
    #[serde(default = "default_currency")]
    currency: String,

    /// Returns JSON with a `rates` object keyed by currency code
    #[serde(default = "default_exchange_rate_url")]
    exchange_rate_url: String,

    #[serde(default = "default_fallback_rate")]
    fallback_rate: f64,

    #[serde(default = "default_rate_cache_hours")]
    rate_cache_hours: u32,

    #[serde(default = "default_progress_cap")]
    progress_cap: u64,

    /// Minutes east of UTC
    #[serde(default = "default_utc_offset_minutes")]
    utc_offset_minutes: i32,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_exchange_rate_url() -> String {
    DEFAULT_EXCHANGE_RATE_URL.to_string()
}

fn default_fallback_rate() -> f64 {
    f64::from(DEFAULT_FALLBACK_RATE)
}

fn default_rate_cache_hours() -> u32 {
    DEFAULT_CACHE_HOURS
}

fn default_progress_cap() -> u64 {
    DEFAULT_PROGRESS_CAP
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency: default_currency(),
            exchange_rate_url: default_exchange_rate_url(),
            fallback_rate: default_fallback_rate(),
            rate_cache_hours: default_rate_cache_hours(),
            progress_cap: default_progress_cap(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if a value is out of range
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            decimal_from_f64(config.fallback_rate).is_some_and(|rate| rate > Decimal::ZERO),
            "Invalid fallback_rate in config file: must be positive, got {}",
            config.fallback_rate
        );
        anyhow::ensure!(
            !config.currency.trim().is_empty(),
            "Invalid currency in config file: must not be empty"
        );
        config.utc_offset()?;

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn utc_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| {
                format!(
                    "Invalid utc_offset_minutes in config file: {}",
                    self.utc_offset_minutes
                )
            })
    }
}
