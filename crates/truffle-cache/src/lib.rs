//! Type-safe key-value persistence for Truffle.
//!
//! Provides a small, ergonomic API for storing JSON documents under string
//! keys, with interchangeable backends:
//!
//! - [`MemoryBackend`]: process-local map, used by tests and one-shot runs
//! - [`DirectoryBackend`]: one file per key under a directory, surviving
//!   restarts the way browser local storage survives page reloads
//!
//! # Example
//!
//! ```rust,ignore
//! use truffle_cache::Cache;
//!
//! let cache = Cache::open_dir(".truffle")?;
//!
//! // Store a value
//! cache.set("cart", &items)?;
//!
//! // Retrieve a value
//! let items: Option<Vec<CartItem>> = cache.get("cart")?;
//!
//! // Delete a value
//! cache.delete("cart")?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{DirectoryBackend, KvBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, DirectoryBackend, KvBackend, MemoryBackend};
}
