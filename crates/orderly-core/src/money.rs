//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as decimal strings: "12.50"                  │
//! │                                                                         │
//! │  Parsed as f64 and multiplied:                                          │
//! │    "0.10" × 3 = 0.30000000000000004  ❌ WRONG!                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "0.10" → 10 cents, × 3 = 30 cents → "0.30"                          │
//! │    The string is parsed digit by digit, never through a float          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderly_core::money::Money;
//!
//! // Parse the wire form
//! let price: Money = "10.99".parse().unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // $21.98
//! let total = price + Money::from_cents(500);   // $15.99
//! assert_eq!(total.to_decimal_string(), "15.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtraction never wraps into nonsense
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: Serializes as plain cents; use [`decimal_string`] for the
///   backend's `"12.50"` form
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.price ("12.50") ──► CartItem.unit_price ──► line_total        │
/// │                                                                         │
/// │  Cart.total_price ──► printed as "$37.50"                              │
/// │                                                                         │
/// │  Order.total_amount ("37.50") ──► order history                        │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

/// Largest amount [`Money::parse_decimal`] accepts: $10,000,000,000.00.
///
/// Keeps any 99-quantity line over a 50-line cart far from `i64` limits.
pub const MAX_PARSED_CENTS: i64 = 1_000_000_000_000;

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use orderly_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Multiplies by a quantity (for line totals). Saturates at the `i64` limits.
    ///
    /// ## Example
    /// ```rust
    /// use orderly_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Parses the backend's decimal form.
    ///
    /// Accepts an optional sign, digits, and at most two fraction digits.
    /// `"12.5"` is 1250 cents, `"0.05"` is 5 cents, `"1.234"` is rejected.
    /// Magnitudes above [`MAX_PARSED_CENTS`] are rejected.
    pub fn parse_decimal(input: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidAmount {
            value: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            Some(_) => (false, trimmed),
            None => return Err(invalid("empty")),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("not a decimal number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("too large"))?
        };
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .filter(|c| *c <= MAX_PARSED_CENTS)
            .ok_or_else(|| invalid("too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Formats in the backend's decimal form, without a currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use orderly_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1250).to_decimal_string(), "12.50");
    /// assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

/// Formats Money as a dollar string.
///
/// ## Example
/// ```rust
/// use orderly_core::money::Money;
///
/// assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
/// assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
/// ```
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Arithmetic Operations
// =============================================================================
// Saturating: amounts come from the backend, and a bad one must not panic.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Wire Form
// =============================================================================

/// Serde adapter for fields the backend sends as decimal strings.
///
/// Numbers are tolerated on input (`12.5` reads the same as `"12.5"`); output
/// is always a two-place string.
///
/// ```rust
/// use orderly_core::money::Money;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Line {
///     #[serde(with = "orderly_core::money::decimal_string")]
///     price: Money,
/// }
///
/// let line: Line = serde_json::from_str(r#"{"price":"4.5"}"#).unwrap();
/// assert_eq!(line.price.cents(), 450);
/// assert_eq!(serde_json::to_string(&line).unwrap(), r#"{"price":"4.50"}"#);
/// ```
pub mod decimal_string {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&money.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            Raw::Number(number) => number.to_string(),
        };
        Money::parse_decimal(&text).map_err(de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1099);
        assert_eq!(m.cents(), 1099);
        assert_eq!(m.dollars(), 10);
        assert_eq!(m.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("12.50").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse_decimal("7").unwrap().cents(), 700);
        assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal("-3.25").unwrap().cents(), -325);
        assert_eq!(Money::parse_decimal(" 4.00 ").unwrap().cents(), 400);
    }

    #[test]
    fn test_parse_decimal_rejects() {
        for bad in ["", "-", ".", "1.234", "abc", "1,50", "1.2.3", "12e3"] {
            assert!(Money::parse_decimal(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(1250).to_decimal_string(), "12.50");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
        assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        assert!(Money::parse_decimal("92233720368547758.07").is_err());
        assert!(Money::parse_decimal("10000000000.01").is_err());
        assert_eq!(
            Money::parse_decimal("10000000000.00").unwrap().cents(),
            MAX_PARSED_CENTS
        );

        let near_max = Money::from_cents(i64::MAX / 100);
        assert_eq!(near_max.multiply_quantity(99).cents(), i64::MAX);
        assert_eq!((near_max * 99 + near_max).cents(), i64::MAX);

        let total: Money = [Money::from_cents(i64::MAX), Money::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_float_drift_does_not_happen() {
        let dime: Money = "0.10".parse().unwrap();
        assert_eq!((dime * 3).to_decimal_string(), "0.30");
    }

    #[test]
    fn test_decimal_string_serde_accepts_numbers() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(with = "decimal_string")]
            price: Money,
        }

        let w: Wrapper = serde_json::from_str(r#"{"price": 9.99}"#).unwrap();
        assert_eq!(w.price.cents(), 999);

        let err = serde_json::from_str::<Wrapper>(r#"{"price": "9.999"}"#);
        assert!(err.is_err());
    }
}
