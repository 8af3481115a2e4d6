//! Product-level sale override.
//!
//! A sale price is an absolute per-unit price. While a sale is active it
//! replaces the option-inclusive price outright; surcharges only feed the
//! "regular price" shown next to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// How a sale was authored, when no explicit sale price is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleRule {
    /// Percentage off the base price (0.0 - 100.0).
    PercentageOff(f64),
    /// Fixed amount off the base price.
    AmountOff(Money),
}

impl SaleRule {
    /// Apply the rule to a base price, never going below zero.
    pub fn apply(&self, base: Money) -> Money {
        match self {
            SaleRule::PercentageOff(percent) => {
                let percent = percent.clamp(0.0, 100.0);
                base.multiply_decimal(1.0 - percent / 100.0)
            }
            SaleRule::AmountOff(amount) => (base - *amount).non_negative(),
        }
    }
}

/// Sale fields of a product, already normalized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaleTerms {
    /// Whether the sale is running. Date gating happens upstream.
    pub active: bool,
    /// Explicit sale price.
    pub price: Option<Money>,
    /// Rule used to derive a price when `price` is absent.
    pub rule: Option<SaleRule>,
    /// Informational only.
    pub starts_at: Option<DateTime<Utc>>,
    /// Informational only.
    pub ends_at: Option<DateTime<Utc>>,
}

/// Price to charge after considering a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOutcome {
    /// Option-inclusive price without the sale.
    pub regular: Money,
    /// Price actually charged per unit.
    pub charged: Money,
    pub on_sale: bool,
}

impl SaleTerms {
    /// The sale price per unit, if the sale is active and priced.
    pub fn sale_price(&self, base: Money) -> Option<Money> {
        if !self.active {
            return None;
        }
        self.price
            .or_else(|| self.rule.as_ref().map(|rule| rule.apply(base)))
    }

    /// Substitute the computed price with the sale price when one applies.
    pub fn evaluate(&self, computed: Money, base: Money) -> SaleOutcome {
        match self.sale_price(base) {
            Some(charged) => SaleOutcome {
                regular: computed,
                charged,
                on_sale: true,
            },
            None => SaleOutcome {
                regular: computed,
                charged: computed,
                on_sale: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_sale_keeps_price() {
        let terms = SaleTerms {
            active: false,
            price: Some(Money::new(1200)),
            ..Default::default()
        };
        let outcome = terms.evaluate(Money::new(1650), Money::new(1500));
        assert!(!outcome.on_sale);
        assert_eq!(outcome.charged, Money::new(1650));
    }

    #[test]
    fn test_sale_price_replaces_computed() {
        let terms = SaleTerms {
            active: true,
            price: Some(Money::new(1200)),
            ..Default::default()
        };
        let outcome = terms.evaluate(Money::new(1650), Money::new(1500));
        assert!(outcome.on_sale);
        assert_eq!(outcome.charged, Money::new(1200));
        assert_eq!(outcome.regular, Money::new(1650));
    }

    #[test]
    fn test_explicit_price_wins_over_rule() {
        let terms = SaleTerms {
            active: true,
            price: Some(Money::new(1000)),
            rule: Some(SaleRule::PercentageOff(50.0)),
            ..Default::default()
        };
        assert_eq!(terms.sale_price(Money::new(1500)), Some(Money::new(1000)));
    }

    #[test]
    fn test_rule_derived_prices() {
        let base = Money::new(1500);
        assert_eq!(SaleRule::PercentageOff(20.0).apply(base), Money::new(1200));
        assert_eq!(SaleRule::PercentageOff(150.0).apply(base), Money::zero());
        assert_eq!(SaleRule::AmountOff(Money::new(250)).apply(base), Money::new(1250));
        assert_eq!(SaleRule::AmountOff(Money::new(9000)).apply(base), Money::zero());
    }

    #[test]
    fn test_active_without_price_or_rule() {
        let terms = SaleTerms {
            active: true,
            ..Default::default()
        };
        let outcome = terms.evaluate(Money::new(1650), Money::new(1500));
        assert!(!outcome.on_sale);
        assert_eq!(outcome.charged, Money::new(1650));
    }
}
