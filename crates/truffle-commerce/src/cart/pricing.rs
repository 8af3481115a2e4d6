//! Cart pricing calculations.

use crate::cart::CartKey;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPricing {
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Sum of all quantities.
    pub item_count: u64,
    pub lines: Vec<LinePricing>,
}

/// Pricing for a single line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePricing {
    pub key: CartKey,
    pub unit_price: Money,
    pub quantity: u32,
    /// unit_price * quantity
    pub total: Money,
}
