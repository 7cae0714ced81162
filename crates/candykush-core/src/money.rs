//! # Money Module
//!
//! Provides the `Money` type for handling baht amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The cart API sends amounts as JSON doubles:                            │
//! │    { "total": 0.30000000000000004 }                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Satang                                           │
//! │    Convert once at the boundary (`from_api_amount`), round to the      │
//! │    nearest satang, and never touch floats again.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use candykush_core::money::Money;
//!
//! let price = Money::from_satang(4550); // ฿45.50
//! let doubled = price * 2;              // ฿91.00
//! assert_eq!(doubled.to_string(), "฿91.00");
//! assert_eq!(doubled.to_decimal_string(), "91.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::Quantity;
use crate::CURRENCY_SYMBOL;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in satang (1/100 baht).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from satang (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use candykush_core::money::Money;
    ///
    /// let price = Money::from_satang(1099); // ฿10.99
    /// assert_eq!(price.satang(), 1099);
    /// ```
    #[inline]
    pub const fn from_satang(satang: i64) -> Self {
        Money(satang)
    }

    /// Creates a Money value from baht and satang parts.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -฿5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts an amount received from the cart API (a JSON double in baht).
    ///
    /// Rounds half away from zero to the nearest satang. Non-finite values
    /// and values that overflow `i64` satang are rejected.
    ///
    /// ## Example
    /// ```rust
    /// use candykush_core::money::Money;
    ///
    /// assert_eq!(Money::from_api_amount(12.5).unwrap().satang(), 1250);
    /// assert_eq!(Money::from_api_amount(0.1 + 0.2).unwrap().satang(), 30);
    /// assert!(Money::from_api_amount(f64::NAN).is_err());
    /// ```
    pub fn from_api_amount(amount: f64) -> CoreResult<Self> {
        let satang = (amount * 100.0).round();
        if !satang.is_finite() || satang.abs() >= i64::MAX as f64 {
            return Err(CoreError::AmountOutOfRange(amount));
        }
        Ok(Money(satang as i64))
    }

    /// Returns the value in satang.
    #[inline]
    pub const fn satang(&self) -> i64 {
        self.0
    }

    /// Returns the whole-baht portion (truncated toward zero).
    #[inline]
    pub const fn baht(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the satang portion (always 0-99).
    #[inline]
    pub const fn satang_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a fractional quantity.
    ///
    /// Quantities carry three decimals (weighed goods), so the product is
    /// rounded half away from zero back to whole satang.
    ///
    /// ## Example
    /// ```rust
    /// use candykush_core::{Money, Quantity};
    ///
    /// let per_gram = Money::from_satang(350);          // ฿3.50 / g
    /// let weight = Quantity::from_milli(1_500);         // 1.5 g
    /// assert_eq!(per_gram.multiply_quantity(weight).satang(), 525);
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Self {
        let product = self.0 as i128 * qty.milli() as i128;
        let rounded = if product >= 0 {
            (product + 500) / 1000
        } else {
            (product - 500) / 1000
        };
        Money(rounded as i64)
    }

    /// Formats the amount with two decimals and no currency symbol.
    ///
    /// This is the `%.2f` rendering used by the text printers.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.baht().abs(), self.satang_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the receipt rendering, e.g. `฿10.99` or `-฿5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            self.baht().abs(),
            self.satang_part()
        )
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a whole count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_satang() {
        let money = Money::from_satang(1099);
        assert_eq!(money.satang(), 1099);
        assert_eq!(money.baht(), 10);
        assert_eq!(money.satang_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).satang(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).satang(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_satang(1099).to_string(), "฿10.99");
        assert_eq!(Money::from_satang(500).to_string(), "฿5.00");
        assert_eq!(Money::from_satang(-550).to_string(), "-฿5.50");
        assert_eq!(Money::from_satang(0).to_string(), "฿0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_satang(123456).to_decimal_string(), "1234.56");
        assert_eq!(Money::from_satang(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn test_api_amount_rounding() {
        assert_eq!(Money::from_api_amount(45.0).unwrap().satang(), 4500);
        // 0.125 is exact in binary, so this exercises half-away-from-zero
        assert_eq!(Money::from_api_amount(0.125).unwrap().satang(), 13);
        assert_eq!(Money::from_api_amount(-0.125).unwrap().satang(), -13);
        assert_eq!(Money::from_api_amount(-2.5).unwrap().satang(), -250);
        assert!(Money::from_api_amount(f64::INFINITY).is_err());
        assert!(Money::from_api_amount(1e300).is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_satang(1000);
        let b = Money::from_satang(500);

        assert_eq!((a + b).satang(), 1500);
        assert_eq!((a - b).satang(), 500);
        assert_eq!((a * 3).satang(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.satang(), 2000);
    }

    #[test]
    fn test_multiply_fractional_quantity() {
        let unit = Money::from_satang(299);
        assert_eq!(unit.multiply_quantity(Quantity::from_units(3)).satang(), 897);
        // 2.99 × 0.333 = 0.99567 → 1.00
        assert_eq!(unit.multiply_quantity(Quantity::from_milli(333)).satang(), 100);
        // Negative prices (refund lines) round away from zero too
        let refund = Money::from_satang(-299);
        assert_eq!(refund.multiply_quantity(Quantity::from_milli(333)).satang(), -100);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_satang(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().satang(), 100);
    }
}
