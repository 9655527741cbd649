use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Sub},
};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// Every price and payment request in the system is denominated in this currency.
pub const DEFAULT_CURRENCY_CODE: &str = "BRL";

const MINOR_UNITS: i64 = 100;

//--------------------------------------        Money        ---------------------------------------------------------
/// An amount of money, stored as a whole number of minor currency units (centavos).
///
/// Storing integers keeps order totals exact. On the wire, `Money` is a plain JSON number in major units, so `500`
/// centavos serializes as `5.0`.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, AddAssign, add_assign);

/// Saturates at the bounds of `i64`. Use [`Money::checked_mul`] where an overflow must be reported.
impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value().saturating_mul(rhs))
    }
}

/// Saturates at the bounds of `i64`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, m| Self(acc.0.saturating_add(m.0)))
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<f64> for Money {
    type Error = MoneyConversionError;

    /// Converts an amount in major units (e.g. `5.25`) into `Money`, rounding to the nearest minor unit.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let minor = (value * MINOR_UNITS as f64).round();
        if !minor.is_finite() || minor > i64::MAX as f64 || minor < i64::MIN as f64 {
            return Err(MoneyConversionError(format!("{value} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(minor as i64))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = MINOR_UNITS.unsigned_abs();
        write!(f, "{sign}R${}.{:02}", abs / units, abs % units)
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_major(units: i64) -> Self {
        Self(units * MINOR_UNITS)
    }

    pub fn checked_mul(self, rhs: i64) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// The amount in major units, for wire formats that expect a decimal number.
    pub fn as_major(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS as f64
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let major = f64::deserialize(deserializer)?;
        Money::try_from(major).map_err(DeError::custom)
    }
}
