use crate::args::{TargetArgs, ViewArgs};
use crate::commands::Out;
use crate::settings::View;
use crate::tracker::Tracker;
use crate::{Config, Result};

/// Changes the daily target without restarting the count of days.
pub async fn set_target(config: Config, args: TargetArgs) -> Result<Out<u32>> {
    let mut tracker = Tracker::load(config);
    tracker.set_target(args.usd())?;
    Ok(Out::new(
        format!("Daily target set to {} USD", args.usd()),
        args.usd(),
    ))
}

pub async fn set_view(config: Config, args: ViewArgs) -> Result<Out<View>> {
    let mut tracker = Tracker::load(config);
    tracker.set_view(args.view())?;
    Ok(Out::new(
        format!("Transactions will be grouped {}", args.view()),
        args.view(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_set_target_keeps_start_date() {
        let env = TestEnv::new().await;
        let mut tracker = Tracker::load(env.config());
        tracker.onboard("Sari", 10).unwrap();
        let start = tracker.settings().start_date();

        let out = set_target(env.config(), TargetArgs::new(25)).await.unwrap();
        assert_eq!(out.structure(), Some(&25));

        let tracker = Tracker::load(env.config());
        assert_eq!(tracker.settings().daily_target_usd(), Some(25));
        assert_eq!(tracker.settings().start_date(), start);
    }

    #[tokio::test]
    async fn test_set_view() {
        let env = TestEnv::new().await;
        let out = set_view(env.config(), ViewArgs::new(View::Yearly))
            .await
            .unwrap();
        assert_eq!(out.message(), "Transactions will be grouped yearly");
        assert_eq!(Tracker::load(env.config()).settings().view(), View::Yearly);
    }
}
