//! Product catalog module.
//!
//! Contains product records, option catalogs, and piece-count derivation.

mod options;
mod pieces;
mod product;
mod source;

pub use options::{
    resolve_catalog, Catalog, CatalogKind, CatalogOption, OptionSource, RawOption, NONE_OPTION_ID,
};
pub use pieces::{piece_count, pieces_from_label};
pub use product::{MixedSettings, Product, ProductRecord, SaleType};
pub use source::{InMemorySource, ProductSource};
