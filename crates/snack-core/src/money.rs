//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With f64 prices:                                                       │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    floor(999.9999999 / 1000) → loyalty points off by one               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents)                              │
//! │    Stored, summed and multiplied as i64                                 │
//! │    Only the JSON boundary speaks decimals: 20000 / 12.5                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use snack_core::money::Money;
//!
//! let price = Money::from_major(10_000);
//! let total = price * 2;
//! assert_eq!(total.cents(), 2_000_000);
//! assert_eq!(total.to_string(), "20000.00");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Minor units per major unit.
const CENTS_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Sums over large ranges never overflow in practice
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Decimal on the wire**: serializes as a JSON number of major units
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price ──► Purchase: price × quantity ──► Transaction.total    │
/// │                                   │                                     │
/// │                                   └──► points_earned(total)             │
/// │                                                                         │
/// │  Σ Transaction.total_price ──► SalesReport.total_income                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use snack_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(999).cents(), 99_900);
    /// ```
    #[inline]
    pub const fn from_major(units: i64) -> Self {
        Money(units * CENTS_PER_UNIT)
    }

    /// Converts a decimal amount into Money, rounding to the nearest cent.
    ///
    /// Returns `None` for NaN, infinities and amounts outside the i64 cent range.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        let cents = (amount * CENTS_PER_UNIT as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if !cents.is_finite() || cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / CENTS_PER_UNIT
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % CENTS_PER_UNIT).abs()
    }

    /// Returns the value as a decimal number of major units.
    ///
    /// ## Note
    /// For serialization and display only. Never compute with the result.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use snack_core::money::Money;
    ///
    /// let unit_price = Money::from_major(10_000);
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total, Money::from_major(20_000));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    ///
    /// ```rust
    /// use snack_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(5).checked_mul(3), Some(Money::from_major(15)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering with two fraction digits, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Serde: decimal major units on the wire
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount)
            .ok_or_else(|| de::Error::custom("monetary amount must be a finite number"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_and_parts() {
        let money = Money::from_cents(1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
        assert_eq!(Money::from_major(20_000).cents(), 2_000_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_major(20_000).to_string(), "20000.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_serializes_as_decimal() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");

        let json = serde_json::to_string(&Money::from_major(20_000)).unwrap();
        assert_eq!(json, "20000.0");
    }

    #[test]
    fn test_deserializes_integers_and_decimals() {
        let whole: Money = serde_json::from_str("10000").unwrap();
        assert_eq!(whole, Money::from_major(10_000));

        let fractional: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(fractional.cents(), 10);

        // 0.1 + 0.2 lands on 30 cents, not 30.000000000000004
        let rounded: Money = serde_json::from_str("0.30000000000000004").unwrap();
        assert_eq!(rounded.cents(), 30);
    }

    #[test]
    fn test_from_decimal_rejects_non_finite() {
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(f64::INFINITY).is_none());
    }

    #[test]
    fn test_from_decimal_rejects_out_of_range() {
        assert!(Money::from_decimal(1e20).is_none());
        assert!(Money::from_decimal(-1e20).is_none());
        assert!(serde_json::from_str::<Money>("1e20").is_err());

        let large = Money::from_decimal(50_000_000_000_000_000.0).unwrap();
        assert_eq!(large.cents(), 5_000_000_000_000_000_000);
    }

    #[test]
    fn test_checked_mul_detects_overflow() {
        let price: Money = serde_json::from_str("50000000000000000").unwrap();
        assert_eq!(price.checked_mul(1), Some(price));
        assert_eq!(price.checked_mul(2), None);
        assert_eq!(Money::from_cents(999).checked_mul(0), Some(Money::zero()));
    }
}
