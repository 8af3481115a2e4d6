//! Cart line items in their persisted shape.

use serde::{Deserialize, Serialize};

use crate::catalog::NONE_OPTION_ID;
use crate::ids::ProductId;
use crate::money::Money;
use crate::pricing::MIXED_TYPE_ID;

fn default_shape() -> String {
    NONE_OPTION_ID.to_string()
}

fn default_quantity() -> u32 {
    1
}

/// Composition of a mixed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedTypeDetails {
    /// e.g. `"3 Milk + 3 Dark"`.
    pub label: String,
    #[serde(default)]
    pub type1: String,
    #[serde(default)]
    pub type2: String,
    pub type1_pieces: u32,
    pub type2_pieces: u32,
    pub ratio: f64,
}

/// A line in the cart.
///
/// Serialized as `{id, name, size, type, shape, price, quantity, image,
/// mixedType?}`. Older entries lacking `shape`, `image` or `mixedType`
/// still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id.
    pub id: ProductId,
    pub name: String,
    /// Size option id.
    pub size: String,
    /// Type option id, or `"mixed"`.
    #[serde(rename = "type")]
    pub chocolate_type: String,
    #[serde(default = "default_shape")]
    pub shape: String,
    /// Unit price including surcharges and sale; never multiplied by quantity.
    pub price: Money,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_type: Option<MixedTypeDetails>,
}

impl CartItem {
    /// Identity used to merge repeated adds.
    pub fn key(&self) -> CartKey {
        CartKey {
            product_id: self.id.clone(),
            size: self.size.clone(),
            chocolate_type: self.chocolate_type.clone(),
        }
    }

    pub fn is_mixed(&self) -> bool {
        self.chocolate_type == MIXED_TYPE_ID
    }

    /// Price for the whole line, or None on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.price.try_multiply(i64::from(self.quantity))
    }

    /// Short description used in listings.
    pub fn describe(&self) -> String {
        let flavor = self
            .mixed_type
            .as_ref()
            .map(|m| m.label.as_str())
            .unwrap_or(self.chocolate_type.as_str());
        let mut text = format!("{} ({}, {})", self.name, self.size, flavor);
        if self.shape != NONE_OPTION_ID {
            text.push_str(&format!(" - {}", self.shape));
        }
        text
    }
}

/// Merge identity of a cart line: product, size and type.
///
/// Shape is not part of the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey {
    pub product_id: ProductId,
    pub size: String,
    pub chocolate_type: String,
}

impl CartKey {
    pub fn new(
        product_id: impl Into<String>,
        size: impl Into<String>,
        chocolate_type: impl Into<String>,
    ) -> Self {
        Self {
            product_id: ProductId::new(product_id),
            size: size.into(),
            chocolate_type: chocolate_type.into(),
        }
    }
}

impl std::fmt::Display for CartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.product_id, self.size, self.chocolate_type)
    }
}
