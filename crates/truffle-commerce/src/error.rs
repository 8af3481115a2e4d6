//! Commerce error types.
//!
//! Malformed catalog or price data never surfaces here; it degrades to a
//! default and is reported through [`crate::diagnostics`]. These errors cover
//! invalid cart requests and storage failures.

use thiserror::Error;
use truffle_cache::CacheError;

/// Errors that can occur in pricing and cart operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u32, u32),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// No product has been loaded yet.
    #[error("Product not loaded: {0}")]
    ProductNotLoaded(String),

    /// Persistence failure.
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
