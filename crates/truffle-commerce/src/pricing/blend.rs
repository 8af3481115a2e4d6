//! Mixed-type blending: splitting a box between two chocolate types.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogOption;
use crate::money::Money;

/// Ratio used when the product hides the continuous ratio control.
pub const FIXED_RATIO: f64 = 50.0;

/// Integer split of a box between two types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSplit {
    pub type1_pieces: u32,
    pub type2_pieces: u32,
}

impl PieceSplit {
    pub fn total(&self) -> u32 {
        self.type1_pieces + self.type2_pieces
    }
}

/// Clamp a ratio into `[0, 100]`. NaN falls back to an even split.
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        FIXED_RATIO
    } else {
        ratio.clamp(0.0, 100.0)
    }
}

/// Split `total` pieces, allocating `ratio` percent to type 1.
///
/// Type 2 always receives the remainder, so the two counts sum to `total`
/// for every ratio.
///
/// ```
/// use std::num::NonZeroU32;
/// use truffle_commerce::pricing::split_pieces;
/// let split = split_pieces(50.0, NonZeroU32::new(7).unwrap());
/// assert_eq!((split.type1_pieces, split.type2_pieces), (4, 3));
/// ```
pub fn split_pieces(ratio: f64, total: NonZeroU32) -> PieceSplit {
    let total = total.get();
    let ratio = clamp_ratio(ratio);
    let type1 = ((ratio / 100.0) * f64::from(total)).round();
    let type1_pieces = (type1.max(0.0) as u32).min(total);
    PieceSplit {
        type1_pieces,
        type2_pieces: total - type1_pieces,
    }
}

/// Result of blending two types by piece count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blend {
    /// Ratio actually applied, after clamping.
    pub ratio: f64,
    pub split: PieceSplit,
    /// Piece-weighted average of the two types' surcharges.
    pub blended_extra: Money,
}

/// Blend two type options over a box of `total` pieces.
///
/// The blended surcharge is `(extra1 * n1 + extra2 * n2) / total`, rounded to
/// the cent. Ratios of 0 and 100 still pass through here.
pub fn blend(
    type1: &CatalogOption,
    type2: &CatalogOption,
    ratio: f64,
    total: NonZeroU32,
) -> Blend {
    let ratio = clamp_ratio(ratio);
    let split = split_pieces(ratio, total);
    let weighted = type1.extra_price.amount_cents as f64 * f64::from(split.type1_pieces)
        + type2.extra_price.amount_cents as f64 * f64::from(split.type2_pieces);
    let blended_cents = (weighted / f64::from(total.get())).round() as i64;

    Blend {
        ratio,
        split,
        blended_extra: Money::new(blended_cents),
    }
}

/// Human-readable composition, e.g. `"3 Milk + 3 Dark"`.
pub fn blend_label(type1: &CatalogOption, type2: &CatalogOption, split: &PieceSplit) -> String {
    format!(
        "{} {} + {} {}",
        split.type1_pieces, type1.label, split.type2_pieces, type2.label
    )
}
