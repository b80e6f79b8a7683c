//! The savings target and progress towards it.
//!
//! The target is cumulative: on the Nth day since the user started, the target is N times the
//! daily amount, converted from USD into the local currency.

use crate::model::Amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// The default ceiling used to scale the progress percentage.
pub const DEFAULT_PROGRESS_CAP: u64 = 1_000_000;

/// Progress towards the target on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub date: NaiveDate,
    pub days_since_start: i64,
    pub cumulative_total: Amount,
    pub target: Amount,
    /// Between 0 and 100, relative to the display cap rather than the target.
    pub percent: Decimal,
    /// True when the cumulative total has reached the target.
    pub success: bool,
}

/// The number of days from `start_date` to `target_date`, counting both ends. Dates before the
/// start count as day 1.
pub fn days_since_start(target_date: NaiveDate, start_date: NaiveDate) -> i64 {
    ((target_date - start_date).num_days() + 1).max(1)
}

/// The cumulative target for `target_date` in the local currency:
/// `daily_target_usd * exchange_rate * days_since_start`.
pub fn daily_target_local(
    target_date: NaiveDate,
    daily_target_usd: u32,
    exchange_rate: Decimal,
    start_date: NaiveDate,
) -> Amount {
    let days = Decimal::from(days_since_start(target_date, start_date));
    let value = Decimal::from(daily_target_usd)
        .checked_mul(exchange_rate)
        .and_then(|per_day| per_day.checked_mul(days))
        .unwrap_or(Decimal::MAX);
    Amount::new(value)
}

/// `cumulative_total` as a percentage of `cap`, limited to `0..=100`. A cap that is not positive
/// gives 0.
pub fn progress_percent(cumulative_total: Amount, cap: Amount) -> Decimal {
    if !cap.is_positive() {
        return Decimal::ZERO;
    }
    cumulative_total
        .value()
        .checked_div(cap.value())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ONE_HUNDRED)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Computes the progress for `date` given the balance up to that date.
pub fn progress(
    date: NaiveDate,
    cumulative_total: Amount,
    daily_target_usd: u32,
    exchange_rate: Decimal,
    start_date: NaiveDate,
    cap: Amount,
) -> Progress {
    let target = daily_target_local(date, daily_target_usd, exchange_rate, start_date);
    Progress {
        date,
        days_since_start: days_since_start(date, start_date),
        cumulative_total,
        target,
        percent: progress_percent(cumulative_total, cap),
        success: cumulative_total >= target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn amount(n: i64) -> Amount {
        Amount::new(Decimal::from(n))
    }

    fn cap() -> Amount {
        Amount::new(Decimal::from(DEFAULT_PROGRESS_CAP))
    }

    #[test]
    fn test_days_since_start_same_day() {
        let d = date("2024-05-17");
        assert_eq!(days_since_start(d, d), 1);
    }

    #[test]
    fn test_days_since_start_before_start_is_one() {
        assert_eq!(days_since_start(date("2023-12-25"), date("2024-01-01")), 1);
        assert_eq!(days_since_start(date("2023-12-31"), date("2024-01-01")), 1);
    }

    #[test]
    fn test_target_scenario() {
        let start = date("2024-01-01");
        let target_date = date("2024-01-03");
        assert_eq!(days_since_start(target_date, start), 3);
        assert_eq!(
            daily_target_local(target_date, 10, Decimal::from(15000), start),
            amount(450_000)
        );
    }

    #[test]
    fn test_target_is_monotonic() {
        let start = date("2024-01-01");
        let rate = Decimal::new(156_255, 1);
        let mut previous = Amount::ZERO;
        for offset in -5..60 {
            let d = start + chrono::Duration::days(offset);
            let target = daily_target_local(d, 7, rate, start);
            assert!(target >= previous);
            previous = target;
        }
    }

    #[test]
    fn test_progress_percent_is_capped() {
        assert_eq!(progress_percent(amount(250_000), cap()), Decimal::from(25));
        assert_eq!(progress_percent(amount(5_000_000), cap()), Decimal::ONE_HUNDRED);
        assert_eq!(progress_percent(amount(-70), cap()), Decimal::ZERO);
        assert_eq!(progress_percent(amount(10), Amount::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_progress_success() {
        let start = date("2024-01-01");
        let reached = progress(
            date("2024-01-03"),
            amount(450_000),
            10,
            Decimal::from(15000),
            start,
            cap(),
        );
        assert!(reached.success);
        assert_eq!(reached.days_since_start, 3);
        assert_eq!(reached.percent, Decimal::from(45));

        let short = progress(
            date("2024-01-03"),
            amount(449_999),
            10,
            Decimal::from(15000),
            start,
            cap(),
        );
        assert!(!short.success);
    }
}
