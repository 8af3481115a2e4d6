//! Product configuration and pricing engine for Truffle.
//!
//! Turns loosely-typed product records into a priced unit and a cart line:
//!
//! - **Catalog**: product records, option catalogs, piece counts
//! - **Pricing**: currency normalization, mixed-type blending, sale override, quotes
//! - **Cart**: line composition, merge rules, the persisted store
//! - **Configurator**: per-product selection state with stale-fetch protection
//!
//! Malformed data never stops a price from being produced. Each fallback is
//! reported as a [`Diagnostic`] to the engine's [`DiagnosticSink`].
//!
//! # Example
//!
//! ```rust,ignore
//! use truffle_commerce::prelude::*;
//!
//! let engine = Engine::default();
//! let record: ProductRecord = serde_json::from_str(json)?;
//! let product = engine.resolve(&record);
//!
//! let selection = Selection::new().size("six").mixed("milk", "dark", 50.0);
//! let quote = engine.quote(&product, &selection);
//! println!("Unit price: {}", quote.unit_price.display());
//!
//! let mut store = CartStore::new(Cache::open_dir(".truffle")?, engine.sink());
//! let confirmation = store.add(engine.compose(&product, &selection, 2)?)?;
//! println!("{}", confirmation.message);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod away;
pub mod cart;
pub mod catalog;
pub mod configurator;
pub mod control;
pub mod diagnostics;
pub mod engine;
pub mod pricing;

pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use engine::Engine;
pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    pub use crate::away::AwayMode;
    pub use crate::configurator::Configurator;
    pub use crate::control::QuantityControl;
    pub use crate::diagnostics::{
        Diagnostic, DiagnosticSink, NullSink, RecordingSink, Severity, TracingSink,
    };
    pub use crate::engine::Engine;

    // Catalog
    pub use crate::catalog::{
        Catalog, CatalogKind, CatalogOption, InMemorySource, Product, ProductRecord,
        ProductSource,
    };

    // Pricing
    pub use crate::pricing::{
        PricingPolicy, Quote, QuotedType, RawPrice, Selection, TypeChoice, MIXED_TYPE_ID,
    };

    // Cart
    pub use crate::cart::{
        Cart, CartItem, CartKey, CartPricing, CartStore, ComposedLine, Confirmation,
        MixedTypeDetails,
    };

    pub use truffle_cache::Cache;
}
