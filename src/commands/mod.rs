//! Command handlers for the savings CLI.
//!
//! This module contains implementations for all CLI subcommands. Each handler loads what it needs
//! from `Config`, does its work and returns an `Out` describing the result.

mod add;
mod delete;
mod edit;
mod init;
mod progress;
mod report;
mod settings;

use crate::args::Selection;
use crate::error::Error;
use crate::ledger::Ledger;
use crate::model::{Transaction, DATE_FORMAT};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add_transaction;
pub use delete::delete_transaction;
pub use edit::edit_transaction;
pub use init::init;
pub use progress::{progress, rate};
pub use report::{chart, list_transactions, summary, ListedTransaction, PeriodReport, SummaryReport};
pub use settings::{set_target, set_view};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Finds the selected transaction and its position.
fn select<'a>(ledger: &'a Ledger, selection: &Selection) -> Result<(usize, &'a Transaction)> {
    match selection {
        Selection::Id(id) => ledger
            .find(id)
            .ok_or_else(|| Error::NotFound(id.clone()).into()),
        Selection::Index(index) => ledger
            .get(*index)
            .map(|t| (*index, t))
            .ok_or_else(|| {
                Error::IndexOutOfRange {
                    index: *index,
                    len: ledger.len(),
                }
                .into()
            }),
    }
}

/// One line describing a transaction, e.g. `2024-01-01 income Rp100.000,00 Salary`.
fn describe(transaction: &Transaction) -> String {
    format!(
        "{} {} {} {}",
        transaction.date().format(DATE_FORMAT),
        transaction.transaction_type(),
        transaction.amount(),
        transaction.description()
    )
}
