use crate::args::InitArgs;
use crate::commands::Out;
use crate::model::DATE_FORMAT;
use crate::settings::Settings;
use crate::tracker::Tracker;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and `config.json` if they do not exist yet, then records the user's
/// name and daily target. The start date becomes today, including when this is run again.
///
/// # Arguments
/// - `home` - The root of the data directory, e.g. `$HOME/savings`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path, args: InitArgs) -> Result<Out<Settings>> {
    let config = Config::load_or_create(home)
        .await
        .context("Unable to create the data directory and configs")?;
    let mut tracker = Tracker::load(config);
    tracker.onboard(args.name(), args.target())?;

    let settings = tracker.settings().clone();
    let message = format!(
        "{}! Saving {} USD a day starting {}",
        tracker.greeting(),
        args.target(),
        tracker.start_date().format(DATE_FORMAT)
    );
    Ok(Out::new(message, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyValueStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_home() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("savings");

        let out = init(&home, InitArgs::new("Sari", 10)).await.unwrap();
        assert!(out.message().starts_with("Welcome, Sari!"));
        assert!(home.join("config.json").is_file());

        let config = Config::load(&home).await.unwrap();
        let tracker = Tracker::load(config);
        assert_eq!(tracker.settings().user_name(), "Sari");
        assert_eq!(tracker.settings().daily_target_usd(), Some(10));
        assert_eq!(tracker.settings().start_date(), Some(tracker.today()));
    }

    #[tokio::test]
    async fn test_init_again_keeps_transactions() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("savings");
        init(&home, InitArgs::new("Sari", 10)).await.unwrap();
        let config = Config::load(&home).await.unwrap();
        config
            .store()
            .set("transactions", r#"[{"id":"a","description":"Gaji","amount":5,"type":"income","date":"2024-01-01"}]"#)
            .unwrap();

        let out = init(&home, InitArgs::new("", 20)).await.unwrap();
        assert!(out.message().starts_with("Welcome!"));
        let tracker = Tracker::load(Config::load(&home).await.unwrap());
        assert_eq!(tracker.ledger().len(), 1);
        assert_eq!(tracker.settings().daily_target_usd(), Some(20));
    }
}
