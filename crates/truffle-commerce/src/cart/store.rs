//! The persisted cart.
//!
//! [`CartStore`] is the only writer of cart state. It loads the saved cart
//! from the [`Cache`] the first time it is touched and writes the whole
//! cart back after every mutation.

use std::sync::Arc;

use serde::Serialize;
use truffle_cache::Cache;

use crate::cart::{Cart, CartItem, CartKey, CartPricing, ComposedLine};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::CommerceError;

/// Storage key the cart lives under unless configured otherwise.
pub const CART_STORAGE_KEY: &str = "cart";

/// What the shopper is told after an add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub name: String,
    /// Quantity of the line after the merge.
    pub quantity: u32,
    pub message: String,
}

/// Owns the cart and keeps storage in step with it.
pub struct CartStore {
    cache: Cache,
    key: String,
    cart: Option<Cart>,
    sink: Arc<dyn DiagnosticSink>,
}

impl CartStore {
    pub fn new(cache: Cache, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            cache,
            key: CART_STORAGE_KEY.to_string(),
            cart: None,
            sink,
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self.cart = None;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current cart, loading it on first access.
    pub fn cart(&mut self) -> &Cart {
        self.hydrate()
    }

    pub fn items(&mut self) -> &[CartItem] {
        &self.hydrate().items
    }

    /// Key of the line at a 1-based position, as shown in listings.
    pub fn key_at(&mut self, position: usize) -> Option<CartKey> {
        let index = position.checked_sub(1)?;
        self.hydrate().items.get(index).map(CartItem::key)
    }

    pub fn pricing(&mut self) -> Result<CartPricing, CommerceError> {
        self.hydrate().pricing()
    }

    /// Merge a composed line into the cart and persist.
    pub fn add(&mut self, line: ComposedLine) -> Result<Confirmation, CommerceError> {
        let ComposedLine { item, summary } = line;
        let confirmation = self.mutate(|cart| {
            let merged = cart.add(item)?;
            Ok(Confirmation {
                name: merged.name.clone(),
                quantity: merged.quantity,
                message: format!("{summary} added to your cart"),
            })
        })?;

        tracing::info!(
            name = %confirmation.name,
            quantity = confirmation.quantity,
            "added to cart"
        );
        Ok(confirmation)
    }

    pub fn increase(&mut self, key: &CartKey) -> Result<u32, CommerceError> {
        self.mutate(|cart| cart.increase(key))
    }

    /// Decrease by one; `None` means the line was removed.
    pub fn decrease(&mut self, key: &CartKey) -> Result<Option<u32>, CommerceError> {
        self.mutate(|cart| cart.decrease(key))
    }

    pub fn set_quantity(&mut self, key: &CartKey, quantity: u32) -> Result<bool, CommerceError> {
        self.mutate(|cart| cart.set_quantity(key, quantity))
    }

    pub fn remove(&mut self, key: &CartKey) -> Result<bool, CommerceError> {
        self.mutate(|cart| Ok(cart.remove(key)))
    }

    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.mutate(|cart| {
            cart.clear();
            Ok(())
        })
    }

    fn hydrate(&mut self) -> &mut Cart {
        if self.cart.is_none() {
            let loaded = self.load();
            self.cart = Some(loaded);
        }
        self.cart.get_or_insert_with(Cart::new)
    }

    fn load(&self) -> Cart {
        match self.cache.get::<Cart>(&self.key) {
            Ok(Some(mut cart)) => {
                let dropped = cart.drop_invalid_lines();
                if dropped > 0 {
                    self.sink.emit(Diagnostic::CartHydrateFailed {
                        key: self.key.clone(),
                        error: format!("dropped {dropped} lines with invalid quantity"),
                    });
                }
                tracing::debug!(key = %self.key, lines = cart.items.len(), "cart hydrated");
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                self.sink.emit(Diagnostic::CartHydrateFailed {
                    key: self.key.clone(),
                    error: e.to_string(),
                });
                Cart::new()
            }
        }
    }

    /// Apply a mutation, then write the whole cart.
    ///
    /// A failed write leaves the in-memory change in place.
    fn mutate<R>(
        &mut self,
        apply: impl FnOnce(&mut Cart) -> Result<R, CommerceError>,
    ) -> Result<R, CommerceError> {
        let result = apply(self.hydrate())?;
        self.persist()?;
        Ok(result)
    }

    fn persist(&self) -> Result<(), CommerceError> {
        let Some(cart) = &self.cart else {
            return Ok(());
        };
        if let Err(e) = self.cache.set(&self.key, cart) {
            self.sink.emit(Diagnostic::CartPersistFailed {
                key: self.key.clone(),
                error: e.to_string(),
            });
            return Err(e.into());
        }
        tracing::debug!(key = %self.key, lines = cart.items.len(), "cart persisted");
        Ok(())
    }
}
