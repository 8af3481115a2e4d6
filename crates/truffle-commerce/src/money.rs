//! Money type for representing monetary values.
//!
//! Amounts are held as integer cents so that every intermediate result is
//! already rounded to two decimal places. On the wire a `Money` is a plain
//! dollar number (`16.5`), matching the persisted cart format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};

/// A US dollar amount stored in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a dollar amount, rounding to the nearest cent.
    ///
    /// ```
    /// use truffle_commerce::money::Money;
    /// let price = Money::from_dollars(16.499);
    /// assert_eq!(price.amount_cents, 1650);
    /// ```
    pub fn from_dollars(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        Self::new((amount * 100.0).round() as i64)
    }

    /// Zero dollars.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Clamp negative amounts to zero.
    pub fn non_negative(self) -> Self {
        Self::new(self.amount_cents.max(0))
    }

    /// Convert to a dollar value.
    pub fn to_dollars(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Format as a display string (e.g., "$16.50").
    pub fn display(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{}${}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Try to add another Money value, returning None on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::new)
    }

    /// Try to subtract another Money value, returning None on overflow.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        self.amount_cents.checked_sub(other.amount_cents).map(Money::new)
    }

    /// Try to multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents.checked_mul(factor).map(Money::new)
    }

    /// Multiply by a decimal factor (e.g., for percentages), rounding to the cent.
    pub fn multiply_decimal(&self, factor: f64) -> Money {
        Money::from_dollars(self.to_dollars() * factor)
    }

    /// Try to sum an iterator of Money values.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        iter.try_fold(Money::zero(), |acc, m| acc.try_add(m))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_add(other.amount_cents))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_sub(other.amount_cents))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Ok(Money::from_dollars(dollars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_dollars() {
        assert_eq!(Money::from_dollars(16.5).amount_cents, 1650);
        assert_eq!(Money::from_dollars(0.1 + 0.2).amount_cents, 30);
        assert_eq!(Money::from_dollars(f64::NAN), Money::zero());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(1650).display(), "$16.50");
        assert_eq!(Money::new(5).display(), "$0.05");
        assert_eq!(Money::new(-150).display(), "-$1.50");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1500);
        let b = Money::new(150);
        assert_eq!((a + b).amount_cents, 1650);
        assert_eq!((a - b).amount_cents, 1350);
        assert_eq!(a.try_multiply(3), Some(Money::new(4500)));
        assert_eq!(Money::new(i64::MAX).try_multiply(2), None);
    }

    #[test]
    fn test_money_percentage() {
        let m = Money::new(1999);
        assert_eq!(m.multiply_decimal(0.9).amount_cents, 1799);
    }

    #[test]
    fn test_money_serializes_as_dollars() {
        let json = serde_json::to_string(&Money::new(1650)).unwrap();
        assert_eq!(json, "16.5");
        let back: Money = serde_json::from_str("16.5").unwrap();
        assert_eq!(back, Money::new(1650));
    }

    #[test]
    fn test_try_sum() {
        let items = [Money::new(100), Money::new(250)];
        assert_eq!(Money::try_sum(items.iter()), Some(Money::new(350)));
    }
}
