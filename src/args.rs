//! These structs provide the CLI interface for the savings CLI.

use crate::model::{TransactionId, TransactionInput, DATE_FORMAT};
use crate::settings::View;
use crate::Result;
use anyhow::bail;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// savings: A command-line tool for tracking savings against a daily target.
///
/// Record your income and expenses, then see how your balance compares with a daily savings
/// target set in USD. The target is converted into your local currency with a daily exchange
/// rate and grows with every day since you started.
///
/// Start with `savings init --name <NAME> --target <USD>`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory if needed and record your name and daily target.
    ///
    /// Running this again resets the start date to today.
    Init(InitArgs),
    /// Add an income or expense transaction.
    Add(AddArgs),
    /// Change a transaction, selected by --id or --index. Fields you leave out keep their values.
    Edit(EditArgs),
    /// Delete a transaction, selected by --id or --index.
    Delete(DeleteArgs),
    /// List transactions grouped by day, month or year, most recent first.
    List(ListArgs),
    /// Show total income, expense and balance.
    Summary,
    /// Show the running balance for each day of a week.
    Chart(ChartArgs),
    /// Show progress towards the savings target.
    Progress(ProgressArgs),
    /// Change the daily savings target. The start date is kept.
    Target(TargetArgs),
    /// Change how the transaction list is grouped.
    View(ViewArgs),
    /// Show the USD exchange rate.
    Rate(RateArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where savings data and configuration is held. Defaults to ~/savings
    #[arg(long, env = "SAVINGS_HOME", default_value_t = default_savings_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `savings init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Your name, used to greet you.
    #[arg(long, default_value = "")]
    name: String,

    /// How many USD you want to save each day.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    target: u32,
}

impl InitArgs {
    pub fn new(name: impl Into<String>, target: u32) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> u32 {
        self.target
    }
}

/// Args for the `savings add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was for.
    description: String,

    /// The amount, greater than zero. For example 150000 or 12.50.
    amount: String,

    /// Either income or expense.
    #[arg(long = "type", short = 't', default_value = "income")]
    transaction_type: String,

    /// The date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        transaction_type: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            transaction_type: transaction_type.into(),
            date,
        }
    }

    /// The unvalidated transaction, dated `today` when no date was given.
    pub fn input(&self, today: NaiveDate) -> TransactionInput {
        let date = self
            .date
            .clone()
            .unwrap_or_else(|| today.format(DATE_FORMAT).to_string());
        TransactionInput::new(self.description.clone(), self.amount.clone())
            .with_type(self.transaction_type.clone())
            .with_date(date)
    }
}

/// Picks one transaction, either by its ID or by its position in the list.
#[derive(Debug, Default, Clone, clap::Args)]
#[group(required = true, multiple = false)]
pub struct Selector {
    /// The ID of the transaction.
    #[arg(long)]
    id: Option<String>,

    /// The position of the transaction in `savings list`, starting at 0 for the newest.
    #[arg(long)]
    index: Option<usize>,
}

/// A resolved `Selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Id(TransactionId),
    Index(usize),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            index: None,
        }
    }

    pub fn index(index: usize) -> Self {
        Self {
            id: None,
            index: Some(index),
        }
    }

    pub fn selection(&self) -> Result<Selection> {
        match (&self.id, self.index) {
            (Some(id), None) => Ok(Selection::Id(TransactionId::from(id.as_str()))),
            (None, Some(index)) => Ok(Selection::Index(index)),
            _ => bail!("Select a transaction with exactly one of --id or --index"),
        }
    }
}

/// Args for the `savings edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    #[clap(flatten)]
    selector: Selector,

    /// A new description.
    #[arg(long)]
    description: Option<String>,

    /// A new amount.
    #[arg(long)]
    amount: Option<String>,

    /// A new type, income or expense.
    #[arg(long = "type", short = 't')]
    transaction_type: Option<String>,

    /// A new date as YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,
}

impl EditArgs {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            description: None,
            amount: None,
            transaction_type: None,
            date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Overlays the given fields on `existing`.
    pub fn apply(&self, mut existing: TransactionInput) -> TransactionInput {
        if let Some(description) = &self.description {
            existing.description = description.clone();
        }
        if let Some(amount) = &self.amount {
            existing.amount = amount.clone();
        }
        if let Some(transaction_type) = &self.transaction_type {
            existing.transaction_type = Some(transaction_type.clone());
        }
        if let Some(date) = &self.date {
            existing.date = Some(date.clone());
        }
        existing
    }
}

/// Args for the `savings delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    #[clap(flatten)]
    selector: Selector,
}

impl DeleteArgs {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// Args for the `savings list` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListArgs {
    /// Group by this period and remember it for next time.
    #[arg(long)]
    view: Option<View>,
}

impl ListArgs {
    pub fn new(view: Option<View>) -> Self {
        Self { view }
    }

    pub fn view(&self) -> Option<View> {
        self.view
    }
}

/// Args for the `savings chart` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ChartArgs {
    /// The first day on the chart as YYYY-MM-DD. Defaults to the Monday of this week.
    #[arg(long)]
    week_start: Option<NaiveDate>,

    /// Move the chart by this many weeks. Negative numbers go back.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    weeks: i64,
}

impl ChartArgs {
    pub fn new(week_start: Option<NaiveDate>, weeks: i64) -> Self {
        Self { week_start, weeks }
    }

    pub fn week_start(&self) -> Option<NaiveDate> {
        self.week_start
    }

    pub fn weeks(&self) -> i64 {
        self.weeks
    }
}

/// Args for the `savings progress` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ProgressArgs {
    /// The date to measure as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl ProgressArgs {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self { date }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Args for the `savings target` command.
#[derive(Debug, Parser, Clone)]
pub struct TargetArgs {
    /// How many USD you want to save each day.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    usd: u32,
}

impl TargetArgs {
    pub fn new(usd: u32) -> Self {
        Self { usd }
    }

    pub fn usd(&self) -> u32 {
        self.usd
    }
}

/// Args for the `savings view` command.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    view: View,
}

impl ViewArgs {
    pub fn new(view: View) -> Self {
        Self { view }
    }

    pub fn view(&self) -> View {
        self.view
    }
}

/// Args for the `savings rate` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct RateArgs {
    /// Fetch a new rate even if the cached one is still fresh.
    #[arg(long)]
    refresh: bool,
}

impl RateArgs {
    pub fn new(refresh: bool) -> Self {
        Self { refresh }
    }

    pub fn refresh(&self) -> bool {
        self.refresh
    }
}

fn default_savings_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("savings"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SAVINGS_HOME instead of relying on the default \
                savings home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("savings")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        <Args as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "savings", "--home", "/tmp/s", "add", "Lunch", "45000", "--type", "expense",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/s"));
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let input = add.input(today);
        assert_eq!(input.description, "Lunch");
        assert_eq!(input.amount, "45000");
        assert_eq!(input.transaction_type.as_deref(), Some("expense"));
        assert_eq!(input.date.as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn test_selector_requires_exactly_one() {
        assert!(Args::try_parse_from(["savings", "delete"]).is_err());
        assert!(Args::try_parse_from(["savings", "delete", "--id", "a", "--index", "0"]).is_err());
        let args = Args::try_parse_from(["savings", "delete", "--index", "3"]).unwrap();
        let Command::Delete(delete) = args.command() else {
            panic!("expected delete");
        };
        assert_eq!(delete.selector().selection().unwrap(), Selection::Index(3));
    }

    #[test]
    fn test_edit_apply_keeps_unset_fields() {
        let existing = TransactionInput::new("Salary", "100")
            .with_type("income")
            .with_date("2024-01-01");
        let edited = EditArgs::new(Selector::index(0))
            .with_amount("250")
            .apply(existing);
        assert_eq!(edited.description, "Salary");
        assert_eq!(edited.amount, "250");
        assert_eq!(edited.date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_parse_chart_negative_weeks() {
        let args = Args::try_parse_from(["savings", "chart", "--weeks", "-2"]).unwrap();
        let Command::Chart(chart) = args.command() else {
            panic!("expected chart");
        };
        assert_eq!(chart.weeks(), -2);
        assert_eq!(chart.week_start(), None);
    }

    #[test]
    fn test_target_must_be_positive() {
        assert!(Args::try_parse_from(["savings", "target", "0"]).is_err());
        assert!(Args::try_parse_from(["savings", "target", "10"]).is_ok());
    }
}
