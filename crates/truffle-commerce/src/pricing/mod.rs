//! Pricing module.
//!
//! Currency normalization, mixed-type blending, sale override, and the
//! quote that combines them into a unit price.

mod blend;
mod currency;
mod quote;
mod sale;

pub use blend::{blend, blend_label, clamp_ratio, split_pieces, Blend, PieceSplit, FIXED_RATIO};
pub use currency::{PriceRole, PriceUnit, PricingPolicy, RawNumber, RawPrice, TaggedAmount};
pub use quote::{quote, MixedBreakdown, Quote, QuotedType, Selection, TypeChoice, MIXED_TYPE_ID};
pub use sale::{SaleOutcome, SaleRule, SaleTerms};
