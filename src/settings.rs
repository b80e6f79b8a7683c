//! User settings: name, savings target, the date saving started and the preferred list view.

use crate::model::DATE_FORMAT;
use crate::storage::{
    self, KeyValueStore, DAILY_TARGET_USD, START_DATE, TRANSACTION_VIEW, USER_NAME,
};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The period used to group transactions for display.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

serde_plain::derive_display_from_serialize!(View);
serde_plain::derive_fromstr_from_deserialize!(View);

/// Settings as loaded from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    start_date: Option<NaiveDate>,
    daily_target_usd: Option<u32>,
    user_name: String,
    view: View,
}

impl Settings {
    /// Reads every setting from `store`. Missing or unreadable values fall back to their defaults.
    /// An unrecognised view is reset to `daily` in storage.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let start_date = storage::read_string(store, START_DATE).and_then(|s| {
            NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .inspect_err(|e| warn!("Ignoring stored start date '{s}': {e}"))
                .ok()
        });

        let daily_target_usd = storage::read_string(store, DAILY_TARGET_USD)
            .and_then(|s| parse_target(&s))
            .filter(|target| *target > 0);

        let user_name = storage::read_string(store, USER_NAME).unwrap_or_default();

        let view = match storage::read_string(store, TRANSACTION_VIEW) {
            None => View::default(),
            Some(s) => s.trim().parse().unwrap_or_else(|_| {
                warn!("Unknown transaction view '{s}', resetting to daily");
                if let Err(e) = store.set(TRANSACTION_VIEW, &View::Daily.to_string()) {
                    warn!("Unable to reset the transaction view: {e:#}");
                }
                View::Daily
            }),
        };

        let settings = Self {
            start_date,
            daily_target_usd,
            user_name,
            view,
        };
        debug!("Loaded settings {settings:?}");
        settings
    }

    /// The stored start date, if the user has set a target.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn daily_target_usd(&self) -> Option<u32> {
        self.daily_target_usd
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// True when the user still needs to provide a name or a target.
    pub fn needs_onboarding(&self) -> bool {
        self.daily_target_usd.is_none() || self.user_name.is_empty()
    }

    /// Records the user's name and target and starts counting from `today`.
    pub fn onboard(
        &mut self,
        store: &dyn KeyValueStore,
        user_name: &str,
        daily_target_usd: u32,
        today: NaiveDate,
    ) -> Result<()> {
        let user_name = user_name.trim();
        write(store, USER_NAME, user_name)?;
        write(store, DAILY_TARGET_USD, &daily_target_usd.to_string())?;
        write(store, START_DATE, &today.format(DATE_FORMAT).to_string())?;
        self.user_name = user_name.to_string();
        self.daily_target_usd = Some(daily_target_usd);
        self.start_date = Some(today);
        Ok(())
    }

    /// Changes the daily target. The start date is left alone.
    pub fn set_daily_target_usd(&mut self, store: &dyn KeyValueStore, usd: u32) -> Result<()> {
        write(store, DAILY_TARGET_USD, &usd.to_string())?;
        self.daily_target_usd = Some(usd);
        Ok(())
    }

    pub fn set_view(&mut self, store: &dyn KeyValueStore, view: View) -> Result<()> {
        write(store, TRANSACTION_VIEW, &view.to_string())?;
        self.view = view;
        Ok(())
    }
}

fn write(store: &dyn KeyValueStore, key: &str, value: &str) -> Result<()> {
    store
        .set(key, value)
        .with_context(|| format!("Unable to save '{key}'"))
}

/// Reads the leading digits of `s`, so `"10"` and `"10 USD"` both give 10.
fn parse_target(s: &str) -> Option<u32> {
    let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_when_empty() {
        let settings = Settings::load(&MemoryStore::default());
        assert_eq!(settings, Settings::default());
        assert!(settings.needs_onboarding());
        assert_eq!(settings.view(), View::Daily);
    }

    #[test]
    fn test_load_stored_values() {
        let store = MemoryStore::with_entries([
            (START_DATE, "2024-01-01"),
            (DAILY_TARGET_USD, "10"),
            (USER_NAME, "Sari"),
            (TRANSACTION_VIEW, "monthly"),
        ]);
        let settings = Settings::load(&store);
        assert_eq!(settings.start_date(), Some(date(2024, 1, 1)));
        assert_eq!(settings.daily_target_usd(), Some(10));
        assert_eq!(settings.user_name(), "Sari");
        assert_eq!(settings.view(), View::Monthly);
        assert!(!settings.needs_onboarding());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let store = MemoryStore::with_entries([
            (START_DATE, "yesterday"),
            (DAILY_TARGET_USD, "0"),
            (TRANSACTION_VIEW, "weekly"),
        ]);
        let settings = Settings::load(&store);
        assert_eq!(settings.start_date(), None);
        assert_eq!(settings.daily_target_usd(), None);
        assert_eq!(settings.view(), View::Daily);
        assert_eq!(store.get(TRANSACTION_VIEW).unwrap().as_deref(), Some("daily"));
    }

    #[test]
    fn test_parse_target_leading_digits() {
        assert_eq!(parse_target("25"), Some(25));
        assert_eq!(parse_target(" 7 USD"), Some(7));
        assert_eq!(parse_target("abc"), None);
    }

    #[test]
    fn test_onboard_and_change_target() {
        let store = MemoryStore::default();
        let mut settings = Settings::load(&store);
        settings.onboard(&store, "  Budi ", 10, date(2024, 1, 1)).unwrap();
        settings.set_daily_target_usd(&store, 20).unwrap();
        settings.set_view(&store, View::Yearly).unwrap();

        let reloaded = Settings::load(&store);
        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.user_name(), "Budi");
        assert_eq!(reloaded.daily_target_usd(), Some(20));
        assert_eq!(reloaded.start_date(), Some(date(2024, 1, 1)));
        assert_eq!(reloaded.view(), View::Yearly);
    }
}
