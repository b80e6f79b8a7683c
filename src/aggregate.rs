//! Derived data computed from a list of transactions: totals, period groups and the running
//! balance shown on the weekly chart.
//!
//! Everything here is a pure function of its arguments and works on whatever slice it is given.

use crate::model::{Amount, Transaction, TransactionType};
use crate::settings::View;
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// The number of days on the chart.
pub const WEEK_DAYS: usize = 7;

/// Income, expense and their difference for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount,
}

/// One group of transactions in the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period<'a> {
    /// The first day of the period.
    pub key: NaiveDate,
    pub summary: Summary,
    pub transactions: Vec<&'a Transaction>,
}

/// A point on the weekly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub balance: Amount,
}

/// Sums the amounts of the transactions of type `transaction_type`.
pub fn sum_by_type<'a, I>(transactions: I, transaction_type: TransactionType) -> Amount
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.transaction_type() == transaction_type)
        .map(Transaction::amount)
        .sum()
}

pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction> + Clone,
{
    let income = sum_by_type(transactions.clone(), TransactionType::Income);
    let expense = sum_by_type(transactions, TransactionType::Expense);
    Summary {
        income,
        expense,
        balance: income - expense,
    }
}

/// The key of the period that `date` falls in: the date itself, the first of its month or the
/// first of its year.
pub fn period_key(date: NaiveDate, view: View) -> NaiveDate {
    match view {
        View::Daily => date,
        View::Monthly => date.with_day(1).unwrap_or(date),
        View::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

/// Groups transactions by period. Every transaction appears in exactly one group, and within a
/// group transactions keep their order from `transactions`.
pub fn group_by_period(
    transactions: &[Transaction],
    view: View,
) -> BTreeMap<NaiveDate, Vec<&Transaction>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Transaction>> = BTreeMap::new();
    for transaction in transactions {
        groups
            .entry(period_key(transaction.date(), view))
            .or_default()
            .push(transaction);
    }
    groups
}

/// The period groups, most recent first, each with its own summary.
pub fn periods_descending(transactions: &[Transaction], view: View) -> Vec<Period<'_>> {
    group_by_period(transactions, view)
        .into_iter()
        .rev()
        .map(|(key, transactions)| Period {
            key,
            summary: summarize(transactions.iter().copied()),
            transactions,
        })
        .collect()
}

/// Income minus expense over all transactions dated on or before `date`.
pub fn balance_through(transactions: &[Transaction], date: NaiveDate) -> Amount {
    transactions
        .iter()
        .filter(|t| t.date() <= date)
        .map(Transaction::signed_amount)
        .sum()
}

/// The running balance for each of the seven days starting at `anchor`.
///
/// Each point is recomputed over every transaction up to and including that day, so the series
/// goes up or down with the transactions and is not a per-day delta.
pub fn cumulative_series(anchor: NaiveDate, transactions: &[Transaction]) -> Vec<SeriesPoint> {
    (0..WEEK_DAYS as u64)
        .filter_map(|offset| anchor.checked_add_days(Days::new(offset)))
        .map(|date| SeriesPoint {
            date,
            balance: balance_through(transactions, date),
        })
        .collect()
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Moves a chart window by `weeks` whole weeks. Negative values go back in time. A shift that
/// leaves the supported date range keeps `start`.
pub fn shift_weeks(start: NaiveDate, weeks: i64) -> NaiveDate {
    let Some(days) = weeks.unsigned_abs().checked_mul(WEEK_DAYS as u64) else {
        return start;
    };
    let shifted = if weeks < 0 {
        start.checked_sub_days(Days::new(days))
    } else {
        start.checked_add_days(Days::new(days))
    };
    shifted.unwrap_or(start)
}
