//! Read-only views of the ledger: the grouped list, the totals and the weekly chart.

use crate::aggregate::{self, SeriesPoint, Summary};
use crate::args::{ChartArgs, ListArgs};
use crate::commands::{describe, Out};
use crate::model::{Transaction, DATE_FORMAT};
use crate::settings::View;
use crate::tracker::Tracker;
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// A transaction together with its position in the ledger, which `--index` refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedTransaction {
    pub index: usize,
    #[serde(flatten)]
    pub transaction: Transaction,
}

/// One group of the transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub key: NaiveDate,
    pub label: String,
    pub summary: Summary,
    pub transactions: Vec<ListedTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub greeting: String,
    pub count: usize,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Lists transactions grouped by the stored view, most recent period first. When `--view` is
/// given it is stored before listing.
pub async fn list_transactions(config: Config, args: ListArgs) -> Result<Out<Vec<PeriodReport>>> {
    let mut tracker = Tracker::load(config);
    if let Some(view) = args.view() {
        tracker.set_view(view)?;
    }
    let view = tracker.settings().view();
    let transactions = tracker.ledger().transactions();
    if transactions.is_empty() {
        return Ok(Out::new("No transactions yet", Vec::new()));
    }

    let positions: HashMap<_, _> = transactions
        .iter()
        .enumerate()
        .map(|(index, t)| (t.id(), index))
        .collect();

    let reports: Vec<PeriodReport> = aggregate::periods_descending(transactions, view)
        .into_iter()
        .map(|period| PeriodReport {
            key: period.key,
            label: period_label(period.key, view),
            summary: period.summary,
            transactions: period
                .transactions
                .into_iter()
                .map(|t| ListedTransaction {
                    index: positions.get(t.id()).copied().unwrap_or_default(),
                    transaction: t.clone(),
                })
                .collect(),
        })
        .collect();

    let mut message = String::new();
    for report in &reports {
        let _ = writeln!(
            message,
            "{}  income {}  expense {}  balance {}",
            report.label, report.summary.income, report.summary.expense, report.summary.balance
        );
        for listed in &report.transactions {
            let _ = writeln!(
                message,
                "  [{}] {} ({})",
                listed.index,
                describe(&listed.transaction),
                listed.transaction.id()
            );
        }
    }
    Ok(Out::new(message.trim_end(), reports))
}

/// The greeting and the totals over every transaction.
pub async fn summary(config: Config) -> Result<Out<SummaryReport>> {
    let tracker = Tracker::load(config);
    let report = SummaryReport {
        greeting: tracker.greeting(),
        count: tracker.ledger().len(),
        summary: tracker.summary(),
    };
    let message = format!(
        "{}\nIncome:  {}\nExpense: {}\nBalance: {}",
        report.greeting, report.summary.income, report.summary.expense, report.summary.balance
    );
    Ok(Out::new(message, report))
}

/// The running balance for seven days. The window starts on `--week-start`, or the Monday of the
/// current week, and is then moved by `--weeks`.
pub async fn chart(config: Config, args: ChartArgs) -> Result<Out<Vec<SeriesPoint>>> {
    let tracker = Tracker::load(config);
    let start = args
        .week_start()
        .unwrap_or_else(|| aggregate::week_start(tracker.today()));
    let anchor = aggregate::shift_weeks(start, args.weeks());
    let series = tracker.weekly_series(anchor);

    let mut message = format!("Balance for the week of {}", anchor.format(DATE_FORMAT));
    for point in &series {
        let _ = write!(
            message,
            "\n{}  {}",
            point.date.format("%a %Y-%m-%d"),
            point.balance
        );
    }
    Ok(Out::new(message, series))
}

fn period_label(key: NaiveDate, view: View) -> String {
    match view {
        View::Daily => key.format(DATE_FORMAT).to_string(),
        View::Monthly => key.format("%B %Y").to_string(),
        View::Yearly => key.format("%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    fn amount(n: i64) -> Amount {
        Amount::new(Decimal::from(n))
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    async fn sample_env() -> TestEnv {
        let env = TestEnv::new().await;
        env.add("Gaji", "100", "income", "2024-01-01").await;
        env.add("Makan", "30", "expense", "2024-01-02").await;
        env.add("Bonus", "500", "income", "2024-02-10").await;
        env
    }

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let out = list_transactions(env.config(), ListArgs::default())
            .await
            .unwrap();
        assert_eq!(out.message(), "No transactions yet");
        assert!(out.structure().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_daily_descending() {
        let env = sample_env().await;
        let out = list_transactions(env.config(), ListArgs::default())
            .await
            .unwrap();
        let reports = out.structure().unwrap();
        let keys: Vec<NaiveDate> = reports.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![date("2024-02-10"), date("2024-01-02"), date("2024-01-01")]
        );
        // the newest transaction is at the front of the ledger
        assert_eq!(reports[0].transactions[0].index, 0);
        assert_eq!(reports[2].transactions[0].index, 2);
        assert!(out.message().starts_with("2024-02-10  income Rp500,00"));
    }

    #[tokio::test]
    async fn test_list_with_view_is_remembered() {
        let env = sample_env().await;
        let out = list_transactions(env.config(), ListArgs::new(Some(View::Monthly)))
            .await
            .unwrap();
        let reports = out.structure().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].label, "February 2024");
        assert_eq!(reports[1].label, "January 2024");
        assert_eq!(reports[1].summary.balance, amount(70));

        // the next listing uses the stored view
        let out = list_transactions(env.config(), ListArgs::default())
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().len(), 2);
        assert_eq!(
            Tracker::load(env.config()).settings().view(),
            View::Monthly
        );
    }

    #[tokio::test]
    async fn test_summary() {
        let env = sample_env().await;
        let out = summary(env.config()).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.greeting, "Welcome");
        assert_eq!(report.count, 3);
        assert_eq!(report.summary.income, amount(600));
        assert_eq!(report.summary.expense, amount(30));
        assert_eq!(report.summary.balance, amount(570));
        assert!(out.message().contains("Balance: Rp570,00"));
    }

    #[tokio::test]
    async fn test_summary_greets_by_name() {
        let env = TestEnv::new().await;
        Tracker::load(env.config()).onboard("Sari", 10).unwrap();
        let out = summary(env.config()).await.unwrap();
        assert!(out.message().starts_with("Welcome, Sari\n"));
    }

    #[tokio::test]
    async fn test_chart_given_week() {
        let env = sample_env().await;
        let args = ChartArgs::new(Some(date("2024-01-01")), 0);
        let out = chart(env.config(), args).await.unwrap();
        let series = out.structure().unwrap();
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].balance, amount(100));
        assert_eq!(series[1].balance, amount(70));
        assert_eq!(series[6].balance, amount(70));
        assert!(out.message().contains("Mon 2024-01-01  Rp100,00"));
    }

    #[tokio::test]
    async fn test_chart_shift_weeks() {
        let env = sample_env().await;
        let args = ChartArgs::new(Some(date("2024-01-08")), -1);
        let out = chart(env.config(), args).await.unwrap();
        let series = out.structure().unwrap();
        assert_eq!(series[0].date, date("2024-01-01"));
    }

    #[tokio::test]
    async fn test_chart_defaults_to_this_week() {
        let env = TestEnv::new().await;
        let out = chart(env.config(), ChartArgs::default()).await.unwrap();
        let series = out.structure().unwrap();
        let today = env.config().today();
        assert_eq!(series[0].date, aggregate::week_start(today));
        assert!(series.iter().any(|p| p.date == today));
        assert!(series.iter().all(|p| p.balance == Amount::ZERO));
    }
}
