//! Monetary amounts in euro cents

use serde::{Deserialize, Serialize};

/// An amount of money in euro cents.
///
/// Integer cents keep the cap boundary exact: 80 × €0.30 is €24.00, not
/// €24.000000000000004.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Round a euro amount to the nearest cent. Negative and NaN become zero.
    pub fn from_euros(euros: f64) -> Self {
        if euros.is_nan() || euros <= 0.0 {
            return Self::ZERO;
        }
        Self((euros * 100.0).round() as u64)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_euros(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiply by a count, saturating at `u64::MAX` cents
    pub fn times(&self, count: u64) -> Money {
        Money(self.0.saturating_mul(count))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "€{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
