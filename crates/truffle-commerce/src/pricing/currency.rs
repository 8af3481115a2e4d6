//! Raw price ingestion and cents/dollars normalization.
//!
//! Catalog data is persisted in cents, but records entered through older
//! admin flows hold dollar values in the same fields. A tagged amount
//! (`{"amount": 300, "unit": "cents"}`) is converted exactly; an untagged
//! number goes through the magnitude heuristic configured in
//! [`PricingPolicy`].

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::money::Money;

/// Role of an amount, selecting which magnitude threshold applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRole {
    /// A product's base or sale price.
    Base,
    /// A surcharge attached to an option or the mixed-type fee.
    OptionExtra,
}

/// Explicit unit of a tagged amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    Cents,
    Dollars,
}

/// A number as it appears in catalog JSON: a real number, a numeric string,
/// or something unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    /// Parse to a finite number.
    ///
    /// `Ok(None)` means the field is blank and should be ignored; `Err`
    /// carries the raw text for diagnostics.
    pub fn parse(&self) -> Result<Option<f64>, String> {
        match self {
            RawNumber::Number(n) if n.is_finite() => Ok(Some(*n)),
            RawNumber::Number(n) => Err(n.to_string()),
            RawNumber::Text(s) => {
                let trimmed = s.trim().trim_start_matches('$');
                if trimmed.is_empty() {
                    return Ok(None);
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(Some(n)),
                    _ => Err(s.clone()),
                }
            }
            RawNumber::Other(serde_json::Value::Null) => Ok(None),
            RawNumber::Other(v) => Err(v.to_string()),
        }
    }
}

/// An amount tagged with its unit at ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedAmount {
    pub amount: RawNumber,
    pub unit: PriceUnit,
}

/// A monetary field straight from a product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Tagged(TaggedAmount),
    Plain(RawNumber),
}

impl RawPrice {
    /// An untagged number, as most catalog data arrives.
    pub fn plain(value: f64) -> Self {
        RawPrice::Plain(RawNumber::Number(value))
    }

    /// A number explicitly marked as cents.
    pub fn cents(value: f64) -> Self {
        RawPrice::Tagged(TaggedAmount {
            amount: RawNumber::Number(value),
            unit: PriceUnit::Cents,
        })
    }

    /// A number explicitly marked as dollars.
    pub fn dollars(value: f64) -> Self {
        RawPrice::Tagged(TaggedAmount {
            amount: RawNumber::Number(value),
            unit: PriceUnit::Dollars,
        })
    }
}

fn default_base_cents_above() -> f64 {
    100.0
}

fn default_extra_cents_min() -> f64 {
    100.0
}

fn default_extra_cents_max() -> f64 {
    500.0
}

fn default_pieces() -> NonZeroU32 {
    NonZeroU32::new(6).unwrap_or(NonZeroU32::MIN)
}

/// Tunable thresholds for the cents/dollars heuristic and piece defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// A base amount strictly above this is read as cents.
    #[serde(default = "default_base_cents_above")]
    pub base_cents_above: f64,

    /// An option extra in `[extra_cents_min, extra_cents_max)` is read as cents.
    #[serde(default = "default_extra_cents_min")]
    pub extra_cents_min: f64,

    /// Exclusive upper bound of the option-extra cents window.
    #[serde(default = "default_extra_cents_max")]
    pub extra_cents_max: f64,

    /// Piece count used when a size option carries none.
    #[serde(default = "default_pieces")]
    pub default_pieces: NonZeroU32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            base_cents_above: default_base_cents_above(),
            extra_cents_min: default_extra_cents_min(),
            extra_cents_max: default_extra_cents_max(),
            default_pieces: default_pieces(),
        }
    }
}

impl PricingPolicy {
    /// Decide whether an untagged value is in cents.
    pub fn reads_as_cents(&self, value: f64, role: PriceRole) -> bool {
        match role {
            PriceRole::Base => value > self.base_cents_above,
            PriceRole::OptionExtra => {
                value >= self.extra_cents_min && value < self.extra_cents_max
            }
        }
    }

    /// Convert an untagged number to money using the magnitude heuristic.
    ///
    /// ```
    /// use truffle_commerce::pricing::{PriceRole, PricingPolicy};
    /// let policy = PricingPolicy::default();
    /// assert_eq!(policy.normalize_amount(1500.0, PriceRole::Base).amount_cents, 1500);
    /// assert_eq!(policy.normalize_amount(15.0, PriceRole::Base).amount_cents, 1500);
    /// assert_eq!(policy.normalize_amount(300.0, PriceRole::OptionExtra).amount_cents, 300);
    /// assert_eq!(policy.normalize_amount(1.0, PriceRole::OptionExtra).amount_cents, 100);
    /// ```
    pub fn normalize_amount(&self, value: f64, role: PriceRole) -> Money {
        if self.reads_as_cents(value, role) {
            Money::from_dollars(value / 100.0)
        } else {
            Money::from_dollars(value)
        }
    }

    /// Normalize a raw price field to money.
    ///
    /// Missing and blank fields are zero. Unparseable or negative values are
    /// zero and reported as [`Diagnostic::InvalidPrice`].
    pub fn normalize(
        &self,
        raw: Option<&RawPrice>,
        role: PriceRole,
        field: &str,
        sink: &dyn DiagnosticSink,
    ) -> Money {
        self.try_normalize(raw, role, field, sink)
            .unwrap_or_else(Money::zero)
    }

    /// Like [`normalize`](Self::normalize), but returns `None` instead of
    /// zero. Only a present, valid, non-negative amount is `Some`; invalid
    /// values are still reported.
    pub fn try_normalize(
        &self,
        raw: Option<&RawPrice>,
        role: PriceRole,
        field: &str,
        sink: &dyn DiagnosticSink,
    ) -> Option<Money> {
        let (amount, unit) = match raw? {
            RawPrice::Tagged(tagged) => (&tagged.amount, Some(tagged.unit)),
            RawPrice::Plain(number) => (number, None),
        };

        let value = match amount.parse() {
            Ok(Some(value)) if value >= 0.0 => value,
            Ok(Some(value)) => {
                report_invalid(sink, field, value.to_string());
                return None;
            }
            Ok(None) => return None,
            Err(raw) => {
                report_invalid(sink, field, raw);
                return None;
            }
        };

        Some(match unit {
            Some(PriceUnit::Cents) => Money::from_dollars(value / 100.0),
            Some(PriceUnit::Dollars) => Money::from_dollars(value),
            None => self.normalize_amount(value, role),
        })
    }
}

fn report_invalid(sink: &dyn DiagnosticSink, field: &str, raw: String) {
    sink.emit(Diagnostic::InvalidPrice {
        field: field.to_string(),
        raw,
    });
}
