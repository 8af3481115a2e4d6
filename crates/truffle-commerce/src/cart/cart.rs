//! The cart: an ordered list of lines merged by identity key.

use crate::cart::{CartItem, CartKey, CartPricing, LinePricing};
use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// A shopping cart. Persisted as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line to the cart.
    ///
    /// A line with the same key absorbs the new quantity and keeps its own
    /// unit price. Returns the resulting line.
    ///
    /// Returns an error if:
    /// - Quantity is zero
    /// - The resulting quantity would exceed MAX_QUANTITY_PER_ITEM
    pub fn add(&mut self, item: CartItem) -> Result<&CartItem, CommerceError> {
        if item.quantity == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }

        let key = item.key();
        if let Some(index) = self.position(&key) {
            let existing = &mut self.items[index];
            let new_quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            existing.quantity = new_quantity;
            return Ok(&self.items[index]);
        }

        if item.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                item.quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Increase a line's quantity by one. Returns the new quantity.
    pub fn increase(&mut self, key: &CartKey) -> Result<u32, CommerceError> {
        let item = self.get_mut(key)?;
        if item.quantity >= MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                item.quantity + 1,
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        item.quantity += 1;
        Ok(item.quantity)
    }

    /// Decrease a line's quantity by one.
    ///
    /// A line at quantity 1 is removed instead; that case returns `None`.
    pub fn decrease(&mut self, key: &CartKey) -> Result<Option<u32>, CommerceError> {
        let item = self.get_mut(key)?;
        if item.quantity > 1 {
            item.quantity -= 1;
            return Ok(Some(item.quantity));
        }
        self.remove(key);
        Ok(None)
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns false if the line does not exist.
    pub fn set_quantity(&mut self, key: &CartKey, quantity: u32) -> Result<bool, CommerceError> {
        if quantity == 0 {
            return Ok(self.remove(key));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        match self.items.iter_mut().find(|i| &i.key() == key) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a line from the cart.
    pub fn remove(&mut self, key: &CartKey) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.key() != key);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop lines whose quantity is zero or above the per-line limit.
    ///
    /// Returns how many lines were dropped.
    pub fn drop_invalid_lines(&mut self) -> usize {
        let len_before = self.items.len();
        self.items
            .retain(|i| (1..=MAX_QUANTITY_PER_ITEM).contains(&i.quantity));
        len_before - self.items.len()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of unique lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by key.
    pub fn get(&self, key: &CartKey) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.key() == key)
    }

    /// Calculate cart totals. Quantity is applied here and nowhere else.
    ///
    /// Returns error if arithmetic overflow occurs.
    pub fn pricing(&self) -> Result<CartPricing, CommerceError> {
        let lines = self
            .items
            .iter()
            .map(|item| {
                Ok(LinePricing {
                    key: item.key(),
                    unit_price: item.price,
                    quantity: item.quantity,
                    total: item.line_total().ok_or(CommerceError::Overflow)?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let subtotal =
            Money::try_sum(lines.iter().map(|l| &l.total)).ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            subtotal,
            item_count: self.item_count(),
            lines,
        })
    }

    fn position(&self, key: &CartKey) -> Option<usize> {
        self.items.iter().position(|i| &i.key() == key)
    }

    fn get_mut(&mut self, key: &CartKey) -> Result<&mut CartItem, CommerceError> {
        self.items
            .iter_mut()
            .find(|i| &i.key() == key)
            .ok_or_else(|| CommerceError::ItemNotInCart(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    fn item(product: &str, size: &str, kind: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(product),
            name: format!("Product {product}"),
            size: size.to_string(),
            chocolate_type: kind.to_string(),
            shape: "none".to_string(),
            price: Money::new(cents),
            quantity,
            image: None,
            mixed_type: None,
        }
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add(item("p1", "six", "milk", 1500, 2)).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_same_key_merges_and_keeps_first_price() {
        let mut cart = Cart::new();
        cart.add(item("p1", "six", "mixed", 1650, 2)).unwrap();
        let merged = cart.add(item("p1", "six", "mixed", 1800, 3)).unwrap();

        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.price, Money::new(1650));
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_different_type_is_new_line() {
        let mut cart = Cart::new();
        cart.add(item("p1", "six", "milk", 1500, 1)).unwrap();
        cart.add(item("p1", "six", "dark", 1800, 1)).unwrap();
        cart.add(item("p1", "twelve", "milk", 1900, 1)).unwrap();
        assert_eq!(cart.unique_item_count(), 3);
    }

    #[test]
    fn test_increase_and_decrease() {
        let mut cart = Cart::new();
        cart.add(item("p1", "six", "milk", 1500, 1)).unwrap();
        let key = CartKey::new("p1", "six", "milk");

        assert_eq!(cart.increase(&key).unwrap(), 2);
        assert_eq!(cart.decrease(&key).unwrap(), Some(1));
        assert_eq!(cart.decrease(&key).unwrap(), None);
        assert!(cart.is_empty());
        assert!(matches!(
            cart.increase(&key),
            Err(CommerceError::ItemNotInCart(_))
        ));
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(item("p1", "six", "milk", 1500, 1)).unwrap();
        let key = CartKey::new("p1", "six", "milk");

        assert!(cart.set_quantity(&key, 7).unwrap());
        assert_eq!(cart.get(&key).unwrap().quantity, 7);
        assert!(cart.set_quantity(&key, 0).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_pricing() {
        let mut cart = Cart::new();
        cart.add(item("p1", "six", "milk", 1000, 2)).unwrap();
        cart.add(item("p2", "none", "dark", 2000, 1)).unwrap();

        let pricing = cart.pricing().unwrap();
        assert_eq!(pricing.subtotal.amount_cents, 4000); // 2*1000 + 1*2000
        assert_eq!(pricing.item_count, 3);
        assert_eq!(pricing.lines[0].unit_price, Money::new(1000));
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new();
        let result = cart.add(item("p1", "six", "milk", 1000, MAX_QUANTITY_PER_ITEM + 1));
        assert!(result.is_err());

        cart.add(item("p1", "six", "milk", 1000, MAX_QUANTITY_PER_ITEM)).unwrap();
        let key = CartKey::new("p1", "six", "milk");
        assert!(cart.increase(&key).is_err());
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::new();
        let result = cart.add(item("p1", "six", "milk", 1000, 0));
        assert!(matches!(result, Err(CommerceError::InvalidQuantity(0))));
    }

    #[test]
    fn test_drop_invalid_lines() {
        let mut cart = Cart {
            items: vec![
                item("p1", "six", "milk", 1000, 0),
                item("p1", "six", "dark", 1000, 2),
                item("p2", "six", "milk", 1000, MAX_QUANTITY_PER_ITEM + 1),
                item("p3", "six", "milk", 1000, MAX_QUANTITY_PER_ITEM),
            ],
        };
        assert_eq!(cart.drop_invalid_lines(), 2);
        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.item_count(), 2 + u64::from(MAX_QUANTITY_PER_ITEM));
        assert_eq!(cart.drop_invalid_lines(), 0);
    }

    #[test]
    fn test_persisted_as_array() {
        let mut cart = Cart::new();
        cart.add(item("p1", "six", "milk", 1000, 1)).unwrap();
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
    }
}
