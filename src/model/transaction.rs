use crate::error::ValidationError;
use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// The format of dates in transaction records and user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a transaction adds to or subtracts from the balance.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A stable identifier assigned to a transaction when it is created. Edits keep the identifier.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single income or expense record.
///
/// The amount is always positive; whether it counts for or against the balance is decided by
/// `transaction_type`. Values of this type can only be built through [`TransactionInput`], so every
/// `Transaction` has passed validation. Stored records are read back with `from_stored`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: TransactionId,
    description: String,
    amount: Amount,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    date: NaiveDate,
}

impl Transaction {
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The amount with the sign implied by the transaction type: positive for income, negative for
    /// expense.
    pub fn signed_amount(&self) -> Amount {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Rebuilds a transaction from a stored JSON record, tolerating the loose records written by
    /// earlier versions of the app: a missing description becomes empty, an unreadable amount
    /// becomes zero, a missing type becomes income and a missing date becomes `today`. Records
    /// without an `id` are given a new one. The result is still validated, so a record with an
    /// empty description or a zero amount is rejected.
    pub(crate) fn from_stored(
        record: &Value,
        today: NaiveDate,
    ) -> Result<Transaction, ValidationError> {
        let description = record
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let amount = match record.get("amount") {
            Some(Value::Number(n)) => n.as_f64().and_then(Amount::from_f64),
            Some(Value::String(s)) => Amount::from_str(s)
                .ok()
                .and_then(|a| Amount::from_f64(a.to_f64())),
            _ => None,
        }
        .unwrap_or_default();
        let transaction_type = record
            .get("type")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| TransactionType::Income.to_string());
        let date = record
            .get("date")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| today.format(DATE_FORMAT).to_string());
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(TransactionId::from)
            .unwrap_or_else(TransactionId::generate);

        TransactionInput::new(description, amount.value().to_string())
            .with_type(transaction_type)
            .with_date(date)
            .validate(id)
    }
}

/// The unvalidated fields of a transaction as a user enters them.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub description: String,
    pub amount: String,
    pub transaction_type: Option<String>,
    pub date: Option<String>,
}

impl TransactionInput {
    pub fn new(description: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            transaction_type: None,
            date: None,
        }
    }

    pub fn with_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Creates an input that holds the current values of `transaction`, for editing.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount.value().to_string(),
            transaction_type: Some(transaction.transaction_type.to_string()),
            date: Some(transaction.date.format(DATE_FORMAT).to_string()),
        }
    }

    /// Checks every field and builds a `Transaction` with the given `id`.
    ///
    /// # Errors
    /// - The description is empty or only whitespace.
    /// - The amount is not a number, is not greater than zero, or would change when stored as a
    ///   JSON number.
    /// - The type is missing or is not `income` or `expense`.
    /// - The date is missing or is not a `YYYY-MM-DD` calendar date.
    pub fn validate(&self, id: TransactionId) -> Result<Transaction, ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = Amount::from_str(&self.amount)
            .map_err(|_| ValidationError::InvalidAmount(self.amount.clone()))?;
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount(self.amount.trim().to_string()));
        }
        if !amount.is_f64_exact() {
            return Err(ValidationError::ImpreciseAmount(self.amount.trim().to_string()));
        }

        let transaction_type = match self.transaction_type.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingType),
            Some(s) => TransactionType::from_str(&s.to_lowercase())
                .map_err(|_| ValidationError::InvalidType(s.to_string()))?,
        };

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingDate),
            Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|_| ValidationError::InvalidDate(s.to_string()))?,
        };

        Ok(Transaction {
            id,
            description: self.description.clone(),
            amount,
            transaction_type,
            date,
        })
    }
}
