//! Amount type for handling rupiah values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts are written to storage as
//! plain JSON numbers and displayed the way Indonesian locales format money, e.g. `Rp1.234.567,89`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// The currency prefix used when displaying an amount.
const CURRENCY_PREFIX: &str = "Rp";

/// Represents an amount of money in the local currency.
///
/// # Examples
///
/// ```
/// # use savings_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1234567.89").unwrap();
/// assert_eq!(amount.to_string(), "Rp1.234.567,89");
///
/// let prefixed = Amount::from_str("Rp50000").unwrap();
/// assert_eq!(prefixed.to_string(), "Rp50.000,00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Converts a floating point number, as found in JSON, into an `Amount`. Returns `None` for
    /// values that are not finite or do not fit in a `Decimal`.
    pub fn from_f64(value: f64) -> Option<Self> {
        decimal_from_f64(value).map(Self)
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// True when the amount reads back unchanged after being written as a JSON number.
    pub fn is_f64_exact(&self) -> bool {
        decimal_from_f64(self.to_f64()) == Some(self.0)
    }
}

/// Converts `value` to a `Decimal` through its shortest round-trip string so that `0.1` becomes
/// exactly `0.1`.
pub(crate) fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(String);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid amount", self.0)
    }
}

impl Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a plain decimal number, optionally prefixed with `Rp`. Underscores and spaces may be
    /// used to group digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let without_prefix = trimmed.strip_prefix(CURRENCY_PREFIX).unwrap_or(trimmed);
        let digits: String = without_prefix
            .chars()
            .filter(|c| *c != '_' && !c.is_whitespace())
            .collect();
        if digits.is_empty() {
            return Err(AmountError(s.to_string()));
        }
        Decimal::from_str(&digits)
            .map(Amount)
            .map_err(|_| AmountError(s.to_string()))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.0.abs())
        } else {
            ("", self.0)
        };

        // format_num writes `1,234.56`; the local convention swaps the two separators.
        let formatted: String = format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
            .chars()
            .map(|c| match c {
                ',' => '.',
                '.' => ',',
                other => other,
            })
            .collect();

        write!(f, "{sign}{CURRENCY_PREFIX}{formatted}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Amount::from_f64(n)
                .ok_or_else(|| serde::de::Error::custom(format!("{n} is not a valid amount"))),
            Raw::Text(s) => Amount::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at the largest or smallest `Decimal` instead of overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}
