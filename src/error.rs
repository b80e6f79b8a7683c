//! Error types.
//!
//! Application code returns `anyhow` results, the same as the rest of the crate. Failures that a
//! caller may need to tell apart are raised as [`Error`] and can be recovered with
//! `anyhow::Error::downcast_ref`.

use crate::model::TransactionId;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// The kinds of failure that the tracker distinguishes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The user supplied a transaction that did not pass validation. Nothing was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A mutation referenced a position outside of the transaction list.
    #[error("index {index} is out of range for {len} transaction(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A mutation referenced a transaction ID that is not in the list.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// A persisted value could not be parsed. This is recovered by falling back to a default and
    /// is only constructed so that it can be logged.
    #[error("unable to parse stored value '{key}': {message}")]
    StorageParse { key: String, message: String },

    /// The exchange rate could not be fetched. This is recovered with the fallback rate.
    #[error("unable to fetch the exchange rate: {0}")]
    Network(String),
}

/// Reasons a transaction input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("amount '{0}' is not a number")]
    InvalidAmount(String),

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(String),

    #[error("amount '{0}' has more digits than can be stored")]
    ImpreciseAmount(String),

    #[error("transaction type is required")]
    MissingType,

    #[error("transaction type must be 'income' or 'expense', got '{0}'")]
    InvalidType(String),

    #[error("date is required")]
    MissingDate,

    #[error("'{0}' is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),
}
