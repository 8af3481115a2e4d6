//! Shopping cart module.
//!
//! Contains cart lines, the cart itself, line composition from a quote,
//! and the persisted store.

mod cart;
mod composer;
mod item;
mod pricing;
mod store;

pub use cart::{Cart, MAX_QUANTITY_PER_ITEM};
pub use composer::{compose_line, ComposedLine};
pub use item::{CartItem, CartKey, MixedTypeDetails};
pub use pricing::{CartPricing, LinePricing};
pub use store::{CartStore, Confirmation, CART_STORAGE_KEY};
