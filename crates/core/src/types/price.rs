//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price in Indian rupees.
///
/// Stored in the currency's standard unit (rupees, not paise). The payment
/// gateway expects amounts in paise, so [`Price::as_paise`] does the
/// conversion exactly once, at the checkout boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal rupee amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The decimal rupee amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in paise, rounded to the nearest whole paisa.
    ///
    /// Returns `None` if the amount does not fit in an `i64` (it never does
    /// for catalog prices; the guard exists because quantities are unbounded
    /// by design).
    #[must_use]
    pub fn as_paise(&self) -> Option<i64> {
        (self.0 * Decimal::from(100)).round().to_i64()
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Add another price.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Format for display, e.g. `₹2500.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("₹{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_paise() {
        assert_eq!(Price::from_rupees(2500).as_paise(), Some(250_000));
        let fractional = Price::new(Decimal::new(9950, 2)); // 99.50
        assert_eq!(fractional.as_paise(), Some(9950));
    }

    #[test]
    fn multiplies_by_quantity() {
        let total = Price::from_rupees(3000).times(3);
        assert_eq!(total, Price::from_rupees(9000));
    }

    #[test]
    fn displays_with_rupee_sign() {
        assert_eq!(Price::from_rupees(2500).display(), "₹2500.00");
    }
}
