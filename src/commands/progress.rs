use crate::api::{self, Mode};
use crate::args::{ProgressArgs, RateArgs};
use crate::commands::Out;
use crate::model::DATE_FORMAT;
use crate::rate::Rate;
use crate::target::Progress;
use crate::tracker::Tracker;
use crate::{Config, Result};

/// Compares the overall balance with the cumulative target for `--date` (default today). Without a daily target there is nothing to compare, and no structure is returned.
pub async fn progress(config: Config, mode: Mode, args: ProgressArgs) -> Result<Out<Progress>> {
    let tracker = Tracker::load(config);
    if tracker.settings().daily_target_usd().is_none() {
        return Ok(Out::new_message(
            "No daily target has been set, run 'savings target <USD>' first",
        ));
    }

    let provider = api::rate_provider(tracker.config(), mode);
    let rate = tracker.exchange_rate(provider.as_ref(), false).await;
    let date = args.date().unwrap_or_else(|| tracker.today());
    let Some(progress) = tracker.progress(date, rate.value) else {
        return Ok(Out::new_message("No daily target has been set"));
    };

    let status = if progress.success {
        "target reached"
    } else {
        "keep going"
    };
    let message = format!(
        "{} (day {}): saved {} of {} target, {}% of the bar, {}",
        progress.date.format(DATE_FORMAT),
        progress.days_since_start,
        progress.cumulative_total,
        progress.target,
        progress.percent.round_dp(0),
        status
    );
    Ok(Out::new(message, progress))
}

/// Shows the USD exchange rate, from the cache unless `--refresh` is given.
pub async fn rate(config: Config, mode: Mode, args: RateArgs) -> Result<Out<Rate>> {
    let tracker = Tracker::load(config);
    let provider = api::rate_provider(tracker.config(), mode);
    let rate = tracker.exchange_rate(provider.as_ref(), args.refresh()).await;
    let message = format!(
        "1 USD = {} {} ({})",
        rate.value.normalize(),
        tracker.config().currency(),
        rate.source
    );
    Ok(Out::new(message, rate))
}
