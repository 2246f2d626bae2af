//! Money amounts in whole currency units.
//!
//! The ordering service prices everything in whole naira, so amounts are
//! plain integers end to end - no fractional cents, no decimal arithmetic.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A monetary amount in whole currency units.
///
/// Arithmetic saturates rather than wrapping; a cart total cannot
/// meaningfully exceed `i64::MAX` currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a new amount from whole currency units.
    #[must_use]
    pub const fn new(units: i64) -> Self {
        Self(units)
    }

    /// Get the underlying whole-unit value.
    #[must_use]
    pub const fn as_units(&self) -> i64 {
        self.0
    }

    /// Apply a rate expressed in basis points (1/100th of a percent),
    /// rounding half-up to the nearest whole unit.
    ///
    /// Used for tax: `Money::new(2700).apply_bps(500)` is 5% of 2700,
    /// rounded, i.e. 135.
    #[must_use]
    pub const fn apply_bps(&self, bps: u32) -> Self {
        let scaled = self.0.saturating_mul(bps as i64);
        Self((scaled + 5_000).div_euclid(10_000))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₦{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        assert_eq!(Money::new(1200) * 2, Money::new(2400));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::new(2400), Money::new(300)].into_iter().sum();
        assert_eq!(total, Money::new(2700));
    }

    #[test]
    fn test_apply_bps_rounds_half_up() {
        // 5% of 2700 = 135 exactly
        assert_eq!(Money::new(2700).apply_bps(500), Money::new(135));
        // 5% of 1010 = 50.5, rounds up to 51
        assert_eq!(Money::new(1010).apply_bps(500), Money::new(51));
        // 5% of 1009 = 50.45, rounds down to 50
        assert_eq!(Money::new(1009).apply_bps(500), Money::new(50));
    }

    #[test]
    fn test_apply_bps_zero() {
        assert_eq!(Money::ZERO.apply_bps(500), Money::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(3135).to_string(), "₦3135");
    }
}
