//! Types that represent the core data model: `Amount` and `Transaction`.
mod amount;
mod transaction;

pub use amount::{Amount, AmountError};
pub(crate) use amount::decimal_from_f64;
pub use transaction::{Transaction, TransactionId, TransactionInput, TransactionType, DATE_FORMAT};
