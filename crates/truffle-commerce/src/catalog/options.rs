//! Option catalogs: raw option records and their canonical form.
//!
//! A product may carry each catalog as a typed JSON array, as a string
//! holding serialized JSON, under a short (`sizes`) or long (`sizeOptions`)
//! field name. [`resolve_catalog`] turns whichever source is usable into a
//! list of [`CatalogOption`]; nothing downstream looks at raw shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ids::{OptionId, ProductId};
use crate::money::Money;
use crate::pricing::{PriceRole, PricingPolicy, RawNumber, RawPrice};

/// Id of the built-in "no choice" size and shape.
pub const NONE_OPTION_ID: &str = "none";

/// Which catalog of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Size,
    Type,
    Shape,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Size => "size",
            CatalogKind::Type => "type",
            CatalogKind::Shape => "shape",
        }
    }

    /// Short product field name (`sizes`, `types`, `shapes`).
    pub fn field_name(&self) -> &'static str {
        match self {
            CatalogKind::Size => "sizes",
            CatalogKind::Type => "types",
            CatalogKind::Shape => "shapes",
        }
    }

    /// Built-in options used when a product has no usable source.
    pub fn default_options(&self) -> Vec<CatalogOption> {
        match self {
            CatalogKind::Size | CatalogKind::Shape => {
                vec![CatalogOption::new(NONE_OPTION_ID, "Regular")]
            }
            CatalogKind::Type => vec![
                CatalogOption::new("milk", "Milk"),
                CatalogOption::new("dark", "Dark"),
            ],
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An option record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOption {
    #[serde(default)]
    pub id: Option<OptionId>,
    #[serde(default, alias = "label")]
    pub name: Option<String>,
    #[serde(default, alias = "extraPrice", alias = "additionalPrice")]
    pub price: Option<RawPrice>,
    /// Pieces per box (size options only).
    #[serde(default)]
    pub quantity: Option<RawNumber>,
}

/// One of the representations a catalog can arrive in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionSource {
    /// A JSON array of option records.
    Typed(Vec<RawOption>),
    /// Legacy: a string containing a serialized JSON array.
    Serialized(String),
    /// Anything else; always unusable.
    Other(serde_json::Value),
}

/// A canonical option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: OptionId,
    pub label: String,
    /// Surcharge for choosing this option.
    pub extra_price: Money,
    /// Pieces per box, when the record states it.
    pub quantity: Option<u32>,
}

impl CatalogOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(id),
            label: label.into(),
            extra_price: Money::zero(),
            quantity: None,
        }
    }

    pub fn with_extra(mut self, extra_price: Money) -> Self {
        self.extra_price = extra_price;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Whether this is the built-in "no choice" option.
    pub fn is_none(&self) -> bool {
        self.id.as_str() == NONE_OPTION_ID
    }

    fn from_raw(
        raw: &RawOption,
        index: usize,
        kind: CatalogKind,
        policy: &PricingPolicy,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        let label = raw.name.as_deref().map(str::trim).unwrap_or_default();
        let id = match &raw.id {
            Some(id) if !id.as_str().is_empty() => id.clone(),
            _ if !label.is_empty() => OptionId::new(slugify(label)),
            _ => OptionId::new(format!("{}-{}", kind.as_str(), index + 1)),
        };
        let label = if label.is_empty() {
            id.as_str().to_string()
        } else {
            label.to_string()
        };

        let field = format!("{}[{}].price", kind.field_name(), id);
        let extra_price =
            policy.normalize(raw.price.as_ref(), PriceRole::OptionExtra, &field, sink);

        let quantity = raw
            .quantity
            .as_ref()
            .and_then(|q| q.parse().ok().flatten())
            .filter(|q| *q >= 1.0)
            .map(|q| q.round() as u32);

        Self {
            id,
            label,
            extra_price,
            quantity,
        }
    }
}

fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Resolved size, type and shape catalogs of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sizes: Vec<CatalogOption>,
    pub types: Vec<CatalogOption>,
    pub shapes: Vec<CatalogOption>,
}

impl Catalog {
    pub fn options(&self, kind: CatalogKind) -> &[CatalogOption] {
        match kind {
            CatalogKind::Size => &self.sizes,
            CatalogKind::Type => &self.types,
            CatalogKind::Shape => &self.shapes,
        }
    }

    pub fn find(&self, kind: CatalogKind, id: &OptionId) -> Option<&CatalogOption> {
        self.options(kind).iter().find(|o| &o.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            sizes: CatalogKind::Size.default_options(),
            types: CatalogKind::Type.default_options(),
            shapes: CatalogKind::Shape.default_options(),
        }
    }
}

/// Produce the option list for one catalog.
///
/// Typed arrays win over serialized strings; among sources of the same
/// kind, earlier ones win. Parse failures are reported and skipped. The
/// result is never empty.
pub fn resolve_catalog(
    product_id: &ProductId,
    kind: CatalogKind,
    sources: &[Option<&OptionSource>],
    policy: &PricingPolicy,
    sink: &dyn DiagnosticSink,
) -> Vec<CatalogOption> {
    let convert = |raw: &[RawOption]| -> Vec<CatalogOption> {
        raw.iter()
            .enumerate()
            .map(|(i, r)| CatalogOption::from_raw(r, i, kind, policy, sink))
            .collect()
    };

    let typed = sources.iter().flatten().find_map(|source| match source {
        OptionSource::Typed(options) if !options.is_empty() => Some(options),
        _ => None,
    });
    if let Some(options) = typed {
        return convert(options);
    }

    let parse_failed = |error: String| {
        sink.emit(Diagnostic::CatalogParseFailed {
            product_id: product_id.to_string(),
            catalog: kind,
            error,
        })
    };

    for source in sources.iter().flatten() {
        match source {
            OptionSource::Serialized(text) if !text.trim().is_empty() => {
                match serde_json::from_str::<Vec<RawOption>>(text) {
                    Ok(options) if !options.is_empty() => return convert(&options),
                    Ok(_) => {}
                    Err(e) => parse_failed(e.to_string()),
                }
            }
            OptionSource::Other(serde_json::Value::Null) => {}
            OptionSource::Other(value) => {
                parse_failed(format!("unsupported option source: {}", value))
            }
            _ => {}
        }
    }

    sink.emit(Diagnostic::CatalogDefaulted {
        product_id: product_id.to_string(),
        catalog: kind,
    });
    kind.default_options()
}
