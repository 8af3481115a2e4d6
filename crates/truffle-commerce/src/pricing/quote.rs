//! Unit price computation for a set of selections.

use serde::{Deserialize, Serialize};

use crate::catalog::{piece_count, CatalogKind, CatalogOption, Product};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ids::{OptionId, ProductId};
use crate::money::Money;
use crate::pricing::{blend, blend_label, Blend, PricingPolicy, FIXED_RATIO};

/// Type id recorded on cart lines that blend two types.
pub const MIXED_TYPE_ID: &str = "mixed";

/// The chocolate-type part of a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeChoice {
    Single {
        id: OptionId,
    },
    Mixed {
        type1: OptionId,
        type2: OptionId,
        /// Percent of the box given to `type1`.
        ratio: f64,
    },
}

/// What the shopper picked. Missing parts fall back to the first option.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub size: Option<OptionId>,
    pub choice: Option<TypeChoice>,
    pub shape: Option<OptionId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, id: impl Into<String>) -> Self {
        self.size = Some(OptionId::new(id));
        self
    }

    pub fn single(mut self, id: impl Into<String>) -> Self {
        self.choice = Some(TypeChoice::Single { id: OptionId::new(id) });
        self
    }

    pub fn mixed(mut self, type1: impl Into<String>, type2: impl Into<String>, ratio: f64) -> Self {
        self.choice = Some(TypeChoice::Mixed {
            type1: OptionId::new(type1),
            type2: OptionId::new(type2),
            ratio,
        });
        self
    }

    pub fn shape(mut self, id: impl Into<String>) -> Self {
        self.shape = Some(OptionId::new(id));
        self
    }
}

/// Composition of a blended selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedBreakdown {
    pub type1: CatalogOption,
    pub type2: CatalogOption,
    pub blend: Blend,
    /// e.g. `"3 Milk + 3 Dark"`.
    pub label: String,
}

/// The resolved type of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuotedType {
    Single(CatalogOption),
    Mixed(MixedBreakdown),
}

/// A fully priced configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub product_id: ProductId,
    pub size: CatalogOption,
    pub shape: CatalogOption,
    pub flavor: QuotedType,
    /// Pieces in one box of the chosen size.
    pub pieces: u32,

    pub base_price: Money,
    pub size_extra: Money,
    /// The single type's surcharge, or the blended surcharge.
    pub type_extra: Money,
    pub mixed_fee: Money,
    pub shape_extra: Money,

    /// Option-inclusive price before any sale.
    pub regular_unit_price: Money,
    /// Price per unit to charge.
    pub unit_price: Money,
    pub on_sale: bool,
}

impl Quote {
    /// Type id as stored on a cart line.
    pub fn type_id(&self) -> &str {
        match &self.flavor {
            QuotedType::Single(option) => option.id.as_str(),
            QuotedType::Mixed(_) => MIXED_TYPE_ID,
        }
    }

    /// Type description for display.
    pub fn type_label(&self) -> &str {
        match &self.flavor {
            QuotedType::Single(option) => &option.label,
            QuotedType::Mixed(mixed) => &mixed.label,
        }
    }

    pub fn mixed(&self) -> Option<&MixedBreakdown> {
        match &self.flavor {
            QuotedType::Mixed(mixed) => Some(mixed),
            QuotedType::Single(_) => None,
        }
    }
}

/// Pick the requested option, or the first one.
fn pick(
    product: &Product,
    kind: CatalogKind,
    requested: Option<&OptionId>,
    sink: &dyn DiagnosticSink,
) -> CatalogOption {
    let options = product.catalog.options(kind);
    let first = options
        .first()
        .cloned()
        .or_else(|| kind.default_options().into_iter().next())
        .unwrap_or_else(|| CatalogOption::new(crate::catalog::NONE_OPTION_ID, "Regular"));

    let Some(id) = requested else {
        return first;
    };
    if let Some(found) = options.iter().find(|o| &o.id == id) {
        return found.clone();
    }

    sink.emit(Diagnostic::UnknownOption {
        catalog: kind,
        requested: id.to_string(),
        substituted: first.id.to_string(),
    });
    first
}

/// Price a selection against a resolved product.
///
/// Unit price = base + size extra + type extra (or blended extra plus the
/// mixed fee) + shape extra, then replaced by the sale price while a sale
/// is active. Selections the product cannot honor degrade to the nearest
/// valid choice.
pub fn quote(
    product: &Product,
    selection: &Selection,
    policy: &PricingPolicy,
    sink: &dyn DiagnosticSink,
) -> Quote {
    let size = pick(product, CatalogKind::Size, selection.size.as_ref(), sink);
    let shape = pick(product, CatalogKind::Shape, selection.shape.as_ref(), sink);
    let pieces = piece_count(&size, policy.default_pieces, sink);

    let flavor = match &selection.choice {
        None => QuotedType::Single(pick(product, CatalogKind::Type, None, sink)),
        Some(TypeChoice::Single { id }) => {
            QuotedType::Single(pick(product, CatalogKind::Type, Some(id), sink))
        }
        Some(TypeChoice::Mixed { type1, .. }) if !product.mixed_available() => {
            sink.emit(Diagnostic::MixedUnavailable {
                product_id: product.id.to_string(),
            });
            QuotedType::Single(pick(product, CatalogKind::Type, Some(type1), sink))
        }
        Some(TypeChoice::Mixed {
            type1,
            type2,
            ratio,
        }) => {
            let first = pick(product, CatalogKind::Type, Some(type1), sink);
            let second = match product.catalog.find(CatalogKind::Type, type2) {
                Some(found) => found.clone(),
                None => {
                    let substitute = product
                        .catalog
                        .types
                        .iter()
                        .find(|o| o.id != first.id)
                        .cloned()
                        .unwrap_or_else(|| first.clone());
                    sink.emit(Diagnostic::UnknownOption {
                        catalog: CatalogKind::Type,
                        requested: type2.to_string(),
                        substituted: substitute.id.to_string(),
                    });
                    substitute
                }
            };

            let ratio = if product.mixed.slider_enabled {
                *ratio
            } else {
                FIXED_RATIO
            };
            let blend = blend(&first, &second, ratio, pieces);
            let label = blend_label(&first, &second, &blend.split);
            QuotedType::Mixed(MixedBreakdown {
                type1: first,
                type2: second,
                blend,
                label,
            })
        }
    };

    let (type_extra, mixed_fee) = match &flavor {
        QuotedType::Single(option) => (option.extra_price, Money::zero()),
        QuotedType::Mixed(mixed) => (mixed.blend.blended_extra, product.mixed.fee),
    };

    let regular =
        product.base_price + size.extra_price + type_extra + mixed_fee + shape.extra_price;
    let outcome = product.sale.evaluate(regular, product.base_price);

    Quote {
        product_id: product.id.clone(),
        pieces: pieces.get(),
        base_price: product.base_price,
        size_extra: size.extra_price,
        type_extra,
        mixed_fee,
        shape_extra: shape.extra_price,
        regular_unit_price: outcome.regular,
        unit_price: outcome.charged,
        on_sale: outcome.on_sale,
        size,
        shape,
        flavor,
    }
}
