//! Fixed-point arithmetic for quotes, rates and amounts
//!
//! Every price that reaches the rate engine is parsed straight into a
//! `Decimal`, so `79.50 * 1.04` is exactly `82.68` and rounding decisions
//! are made on the true value rather than on a binary approximation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::{Add, Sub, Mul, Div, Neg, AddAssign, SubAssign, MulAssign};
use std::str::FromStr;

/// Fixed-point decimal type for exact financial calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed {
    value: Decimal,
}

impl Fixed {
    /// Zero value
    pub const ZERO: Fixed = Fixed {
        value: Decimal::ZERO,
    };

    /// One value
    pub const ONE: Fixed = Fixed {
        value: Decimal::ONE,
    };

    /// One hundred, the percent denominator
    pub const HUNDRED: Fixed = Fixed {
        value: Decimal::ONE_HUNDRED,
    };

    /// Wrap a Decimal
    pub const fn from_decimal(value: Decimal) -> Self {
        Fixed { value }
    }

    /// Build from a mantissa and a scale, `Fixed::new(1035, 3) == 1.035`
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Fixed {
            value: Decimal::new(mantissa, scale),
        }
    }

    /// Create a Fixed from an integer
    pub fn from_i64(value: i64) -> Self {
        Fixed {
            value: Decimal::from(value),
        }
    }

    /// Parse a decimal string exactly
    pub fn from_str_exact(s: &str) -> Result<Self, FixedError> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self::from_decimal)
            .map_err(|_| FixedError::InvalidValue(trimmed.to_string()))
    }

    /// Parse a JSON number or numeric string
    ///
    /// Exchanges disagree on whether prices are `"32.10"` or `32.10`,
    /// both are accepted. Numbers are read from their literal text.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, FixedError> {
        match value {
            serde_json::Value::String(s) => Self::from_str_exact(s),
            serde_json::Value::Number(n) => Self::from_str_exact(&n.to_string()),
            other => Err(FixedError::InvalidValue(other.to_string())),
        }
    }

    /// Get the underlying Decimal value
    pub fn to_decimal(&self) -> Decimal {
        self.value
    }

    /// Check if the value is zero
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Fixed {
            value: self.value.abs(),
        }
    }

    /// Round half away from zero, the one midpoint rule used for every
    /// published rate
    pub fn round_dp(&self, dp: u32) -> Self {
        Fixed {
            value: self
                .value
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    /// Round towards positive infinity at `dp` decimal places
    pub fn ceil_dp(&self, dp: u32) -> Self {
        Fixed {
            value: self.value.round_dp_with_strategy(dp, RoundingStrategy::ToPositiveInfinity),
        }
    }

    /// Round towards negative infinity at `dp` decimal places
    pub fn floor_dp(&self, dp: u32) -> Self {
        Fixed {
            value: self.value.round_dp_with_strategy(dp, RoundingStrategy::ToNegativeInfinity),
        }
    }

    /// Division that reports a zero divisor instead of panicking
    pub fn checked_div(&self, rhs: Fixed) -> Result<Fixed, FixedError> {
        if rhs.is_zero() {
            return Err(FixedError::DivisionByZero);
        }
        self.value
            .checked_div(rhs.value)
            .map(Self::from_decimal)
            .ok_or(FixedError::Overflow)
    }

    /// Multiplication that reports overflow instead of panicking
    pub fn checked_mul(&self, rhs: Fixed) -> Result<Fixed, FixedError> {
        self.value
            .checked_mul(rhs.value)
            .map(Self::from_decimal)
            .ok_or(FixedError::Overflow)
    }

    /// `1 + percent / 100`, the markup factor for a margin in percent
    pub fn markup_factor(percent: Fixed) -> Fixed {
        Fixed::ONE + percent / Fixed::HUNDRED
    }

    /// `1 - percent / 100`, the discount factor for a margin in percent
    pub fn discount_factor(percent: Fixed) -> Fixed {
        Fixed::ONE - percent / Fixed::HUNDRED
    }
}

/// Fixed-point arithmetic errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixedError {
    #[error("Invalid decimal value: {0}")]
    InvalidValue(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Overflow in arithmetic operation")]
    Overflow,
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Self) -> Self::Output {
        Fixed {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Self) -> Self::Output {
        Fixed {
            value: self.value - rhs.value,
        }
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    fn mul(self, rhs: Self) -> Self::Output {
        Fixed {
            value: self.value * rhs.value,
        }
    }
}

/// Panics on a zero divisor like `Decimal`, use `checked_div` on untrusted input
impl Div for Fixed {
    type Output = Fixed;

    fn div(self, rhs: Self) -> Self::Output {
        Fixed {
            value: self.value / rhs.value,
        }
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    fn neg(self) -> Self::Output {
        Fixed { value: -self.value }
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl MulAssign for Fixed {
    fn mul_assign(&mut self, rhs: Self) {
        self.value *= rhs.value;
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl FromStr for Fixed {
    type Err = FixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_exact(s)
    }
}

impl From<Decimal> for Fixed {
    fn from(value: Decimal) -> Self {
        Fixed { value }
    }
}

impl From<Fixed> for Decimal {
    fn from(fixed: Fixed) -> Self {
        fixed.value
    }
}

/// Convenience macro for creating Fixed values from literals
#[macro_export]
macro_rules! fixed {
    ($value:expr) => {
        $crate::fixed::Fixed::from_str_exact(stringify!($value)).unwrap()
    };
}
