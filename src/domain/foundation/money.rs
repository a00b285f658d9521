//! Money value object.
//!
//! Amounts are carried in major currency units (rupees) everywhere inside
//! the core; the payment gateway boundary converts to minor units (paise)
//! exactly once. Prices are parsed once at ingestion, so no raw price
//! strings flow through pricing math.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raised when a price cannot be read as a non-negative amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPriceError {
    #[error("Price '{input}' is not a number")]
    NotANumber { input: String },

    #[error("Price {amount} is negative")]
    Negative { amount: Decimal },
}

/// A non-negative currency amount in major units.
///
/// Construction normalizes to two decimal places (half-up), so equality
/// behaves as users expect: `Money::parse("100")? == Money::parse("100.00")?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Creates a Money value from a decimal, rejecting negatives.
    pub fn new(amount: Decimal) -> Result<Self, InvalidPriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(InvalidPriceError::Negative { amount });
        }
        Ok(Self(round_half_up(amount)))
    }

    /// Parses a price string, tolerating the currency symbols and separators
    /// the event form historically produced ("₹250", "$25", "1,500").
    pub fn parse(input: &str) -> Result<Self, InvalidPriceError> {
        let cleaned: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, '₹' | '$' | ',') && !c.is_whitespace())
            .collect();

        let amount: Decimal = cleaned.parse().map_err(|_| InvalidPriceError::NotANumber {
            input: input.to_string(),
        })?;

        Self::new(amount)
    }

    /// Creates a Money value from whole major units.
    pub fn from_major(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Converts minor units (paise) back to a Money value.
    pub fn from_minor_units(minor: i64) -> Result<Self, InvalidPriceError> {
        Self::new(Decimal::new(minor, 2))
    }

    /// Converts to minor units (paise) for the gateway boundary.
    ///
    /// The amount is already normalized to two decimal places, so this is
    /// exact.
    pub fn to_minor_units(&self) -> i64 {
        (self.0 * Decimal::from(100))
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Returns the inner decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// True when the amount is zero (a free event).
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies by a participant count.
    pub fn times(&self, count: u32) -> Self {
        Self(self.0 * Decimal::from(count))
    }

    /// Multiplies by a fractional rate, rounding half-up to the paise.
    pub fn at_rate(&self, rate: Decimal) -> Self {
        Self(round_half_up(self.0 * rate))
    }

    /// Subtracts, saturating at zero.
    pub fn minus(&self, other: Money) -> Self {
        let diff = self.0 - other.0;
        if diff.is_sign_negative() {
            Self::zero()
        } else {
            Self(diff)
        }
    }
}

/// Round half-up to two decimal places (the currency's smallest unit).
fn round_half_up(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract().is_zero() {
            write!(f, "₹{}", self.0.trunc())
        } else {
            write!(f, "₹{}", self.0)
        }
    }
}
