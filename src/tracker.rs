//! The context for one run of the app: configuration, the transaction ledger and the user's
//! settings, loaded together from the same store.

use crate::aggregate::{self, SeriesPoint, Summary};
use crate::api::RateProvider;
use crate::ledger::Ledger;
use crate::rate::{self, Rate};
use crate::settings::{Settings, View};
use crate::target::{self, Progress};
use crate::{Config, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug)]
pub struct Tracker {
    config: Config,
    ledger: Ledger,
    settings: Settings,
}

impl Tracker {
    /// Reads the ledger and settings from the configured store. Unreadable values fall back to
    /// their defaults, so this does not fail.
    pub fn load(config: Config) -> Self {
        let store = config.store();
        let settings = Settings::load(store.as_ref());
        let mut ledger = Ledger::load(store, config.today());
        ledger.subscribe(|event| debug!("Ledger changed: {event:?}"));
        Self {
            config,
            ledger,
            settings,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }

    /// The stored start date, or today when the user has never been onboarded.
    pub fn start_date(&self) -> NaiveDate {
        self.settings.start_date().unwrap_or_else(|| self.today())
    }

    /// `Welcome, <name>`, or just `Welcome` when no name is stored.
    pub fn greeting(&self) -> String {
        match self.settings.user_name() {
            "" => "Welcome".to_string(),
            name => format!("Welcome, {name}"),
        }
    }

    /// Stores the user's name and daily target and restarts the count of days from today.
    pub fn onboard(&mut self, user_name: &str, daily_target_usd: u32) -> Result<()> {
        check_target(daily_target_usd)?;
        let today = self.today();
        let store = self.config.store();
        self.settings
            .onboard(store.as_ref(), user_name, daily_target_usd, today)
    }

    pub fn set_target(&mut self, daily_target_usd: u32) -> Result<()> {
        check_target(daily_target_usd)?;
        let store = self.config.store();
        self.settings
            .set_daily_target_usd(store.as_ref(), daily_target_usd)
    }

    pub fn set_view(&mut self, view: View) -> Result<()> {
        let store = self.config.store();
        self.settings.set_view(store.as_ref(), view)
    }

    /// The exchange rate from the cache or `provider`. With `refresh` the cache is skipped.
    pub async fn exchange_rate(&self, provider: &dyn RateProvider, refresh: bool) -> Rate {
        let store = self.config.store();
        let now = self.config.now();
        let fallback = self.config.fallback_rate();
        if refresh {
            rate::refresh_rate(store.as_ref(), provider, now, fallback).await
        } else {
            let ttl = self.config.rate_cache_ttl();
            rate::current_rate(store.as_ref(), provider, now, ttl, fallback).await
        }
    }

    /// Income, expense and balance over every transaction.
    pub fn summary(&self) -> Summary {
        aggregate::summarize(self.ledger.transactions())
    }

    /// The balance for each of the seven days starting at `anchor`.
    pub fn weekly_series(&self, anchor: NaiveDate) -> Vec<SeriesPoint> {
        aggregate::cumulative_series(anchor, self.ledger.transactions())
    }

    /// Progress on `date`: the target grows with the days up to `date`, and is compared with the
    /// overall balance. `None` when no daily target has been set.
    pub fn progress(&self, date: NaiveDate, exchange_rate: Decimal) -> Option<Progress> {
        let daily_target_usd = self.settings.daily_target_usd()?;
        let total = self.summary().balance;
        Some(target::progress(
            date,
            total,
            daily_target_usd,
            exchange_rate,
            self.start_date(),
            self.config.progress_cap(),
        ))
    }
}

fn check_target(daily_target_usd: u32) -> Result<()> {
    anyhow::ensure!(
        daily_target_usd > 0,
        "The daily target must be a positive number of USD"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OfflineRate;
    use crate::model::{Amount, TransactionInput};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_greeting() {
        let env = TestEnv::new().await;
        let mut tracker = Tracker::load(env.config());
        assert_eq!(tracker.greeting(), "Welcome");
        tracker.onboard("Sari", 10).unwrap();
        assert_eq!(tracker.greeting(), "Welcome, Sari");
    }

    #[tokio::test]
    async fn test_onboard_sets_start_date_to_today() {
        let env = TestEnv::new().await;
        let mut tracker = Tracker::load(env.config());
        assert!(tracker.settings().needs_onboarding());
        tracker.onboard("Budi", 10).unwrap();

        let reloaded = Tracker::load(env.config());
        assert_eq!(reloaded.settings().start_date(), Some(reloaded.today()));
        assert_eq!(reloaded.settings().daily_target_usd(), Some(10));
        assert!(!reloaded.settings().needs_onboarding());
    }

    #[tokio::test]
    async fn test_zero_target_is_rejected() {
        let env = TestEnv::new().await;
        let mut tracker = Tracker::load(env.config());
        assert!(tracker.onboard("Budi", 0).is_err());
        assert!(tracker.set_target(0).is_err());
        assert_eq!(tracker.settings().daily_target_usd(), None);
    }

    #[tokio::test]
    async fn test_progress_needs_target() {
        let env = TestEnv::new().await;
        let tracker = Tracker::load(env.config());
        assert!(tracker.progress(tracker.today(), Decimal::from(15000)).is_none());
    }

    #[tokio::test]
    async fn test_progress_uses_overall_balance() {
        let env = TestEnv::new().await;
        let mut tracker = Tracker::load(env.config());
        tracker.onboard("Sari", 1).unwrap();
        let today = tracker.today();
        let tomorrow = today.succ_opt().unwrap();
        let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
        let ledger = tracker.ledger_mut();
        ledger
            .add(
                &TransactionInput::new("Salary", "20000")
                    .with_type("income")
                    .with_date(fmt(today)),
                None,
            )
            .unwrap();
        ledger
            .add(
                &TransactionInput::new("Bonus", "50000")
                    .with_type("income")
                    .with_date(fmt(tomorrow)),
                None,
            )
            .unwrap();

        // tomorrow's bonus counts towards today's progress
        let progress = tracker.progress(today, Decimal::from(15000)).unwrap();
        assert_eq!(progress.cumulative_total, Amount::new(Decimal::from(70000)));
        assert_eq!(progress.target, Amount::new(Decimal::from(15000)));
        assert!(progress.success);
        assert_eq!(progress.percent, Decimal::from(7));

        tracker
            .ledger_mut()
            .add(
                &TransactionInput::new("Rent", "60000")
                    .with_type("expense")
                    .with_date(fmt(tomorrow)),
                None,
            )
            .unwrap();
        let progress = tracker.progress(today, Decimal::from(15000)).unwrap();
        assert_eq!(progress.cumulative_total, Amount::new(Decimal::from(10000)));
        assert!(!progress.success);
    }

    #[tokio::test]
    async fn test_exchange_rate_falls_back() {
        let env = TestEnv::new().await;
        let tracker = Tracker::load(env.config());
        let rate = tracker
            .exchange_rate(&OfflineRate::failing(), false)
            .await;
        assert_eq!(rate.value, Decimal::from(15000));
    }
}
