//! Turns a priced configuration into a cart line.

use crate::cart::{CartItem, MixedTypeDetails, MAX_QUANTITY_PER_ITEM};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::pricing::Quote;

/// A cart line ready to merge, plus the text shown to the shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLine {
    pub item: CartItem,
    /// e.g. `"2 × Truffle Box (3 Milk + 3 Dark) - Round"`.
    pub summary: String,
}

/// Build the cart line for `quantity` units of a quoted configuration.
///
/// The line carries the quote's unit price; quantity is applied only when
/// the cart is totalled.
pub fn compose_line(
    product: &Product,
    quote: &Quote,
    quantity: u32,
) -> Result<ComposedLine, CommerceError> {
    if quantity == 0 {
        return Err(CommerceError::InvalidQuantity(0));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }

    let mixed_type = quote.mixed().map(|mixed| MixedTypeDetails {
        label: mixed.label.clone(),
        type1: mixed.type1.id.to_string(),
        type2: mixed.type2.id.to_string(),
        type1_pieces: mixed.blend.split.type1_pieces,
        type2_pieces: mixed.blend.split.type2_pieces,
        ratio: mixed.blend.ratio,
    });

    let item = CartItem {
        id: product.id.clone(),
        name: product.name.clone(),
        size: quote.size.id.to_string(),
        chocolate_type: quote.type_id().to_string(),
        shape: quote.shape.id.to_string(),
        price: quote.unit_price,
        quantity,
        image: product.image.clone(),
        mixed_type,
    };

    let mut summary = format!("{} × {} ({})", quantity, product.name, quote.type_label());
    if !quote.shape.is_none() {
        summary.push_str(" - ");
        summary.push_str(&quote.shape.label);
    }

    Ok(ComposedLine { item, summary })
}
