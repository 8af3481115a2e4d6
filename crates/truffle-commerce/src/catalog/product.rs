//! Product records and their resolved, priced form.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{resolve_catalog, Catalog, CatalogKind, OptionSource};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ids::ProductId;
use crate::money::Money;
use crate::pricing::{PriceRole, PricingPolicy, RawNumber, RawPrice, SaleRule, SaleTerms};

/// How a sale was authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    Percentage,
    Fixed,
    #[serde(other)]
    Unknown,
}

fn default_true() -> bool {
    true
}

/// A product exactly as the catalog service returns it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "price")]
    pub base_price: Option<RawPrice>,
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub sizes: Option<OptionSource>,
    #[serde(default)]
    pub size_options: Option<OptionSource>,
    #[serde(default)]
    pub types: Option<OptionSource>,
    #[serde(default)]
    pub type_options: Option<OptionSource>,
    #[serde(default)]
    pub shapes: Option<OptionSource>,
    #[serde(default)]
    pub shape_options: Option<OptionSource>,

    #[serde(default)]
    pub mixed_type_enabled: bool,
    #[serde(default = "default_true")]
    pub enable_mixed_slider: bool,
    #[serde(default)]
    pub mixed_type_fee: Option<RawPrice>,

    #[serde(default)]
    pub sale_active: bool,
    #[serde(default)]
    pub sale_type: Option<SaleType>,
    #[serde(default)]
    pub sale_value: Option<RawNumber>,
    #[serde(default)]
    pub sale_price: Option<RawPrice>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub sale_start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub sale_end_date: Option<DateTime<Utc>>,
}

impl ProductRecord {
    /// A record with only an id, name and base price.
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: RawPrice) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            base_price: Some(base_price),
            enable_mixed_slider: true,
            ..Default::default()
        }
    }

    /// Option sources for a catalog, short field name first.
    pub fn option_sources(&self, kind: CatalogKind) -> [Option<&OptionSource>; 2] {
        match kind {
            CatalogKind::Size => [self.sizes.as_ref(), self.size_options.as_ref()],
            CatalogKind::Type => [self.types.as_ref(), self.type_options.as_ref()],
            CatalogKind::Shape => [self.shapes.as_ref(), self.shape_options.as_ref()],
        }
    }
}

/// Accept RFC 3339 timestamps or bare `YYYY-MM-DD` dates; anything else is
/// treated as absent.
fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = value else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(text.trim()) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc()))
}

/// Mixed-type settings of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedSettings {
    pub enabled: bool,
    /// When false the ratio is fixed at 50.
    pub slider_enabled: bool,
    /// Flat fee added to every mixed selection.
    pub fee: Money,
}

/// A product with canonical catalogs and normalized money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub base_price: Money,
    pub catalog: Catalog,
    pub mixed: MixedSettings,
    pub sale: SaleTerms,
}

impl Product {
    /// Resolve a raw record. Never fails; bad fields degrade and are reported.
    pub fn resolve(
        record: &ProductRecord,
        policy: &PricingPolicy,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        let catalog_for = |kind: CatalogKind| {
            resolve_catalog(&record.id, kind, &record.option_sources(kind), policy, sink)
        };
        let catalog = Catalog {
            sizes: catalog_for(CatalogKind::Size),
            types: catalog_for(CatalogKind::Type),
            shapes: catalog_for(CatalogKind::Shape),
        };

        let base_price =
            policy.normalize(record.base_price.as_ref(), PriceRole::Base, "basePrice", sink);
        let fee = policy.normalize(
            record.mixed_type_fee.as_ref(),
            PriceRole::OptionExtra,
            "mixedTypeFee",
            sink,
        );

        // An invalid sale price counts as absent so the computed price stands.
        let sale_price =
            policy.try_normalize(record.sale_price.as_ref(), PriceRole::Base, "salePrice", sink);
        let sale = SaleTerms {
            active: record.sale_active,
            price: sale_price,
            rule: sale_rule(record, policy, sink),
            starts_at: record.sale_start_date,
            ends_at: record.sale_end_date,
        };

        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            image: record.image.clone().or_else(|| record.images.first().cloned()),
            base_price,
            catalog,
            mixed: MixedSettings {
                enabled: record.mixed_type_enabled,
                slider_enabled: record.enable_mixed_slider,
                fee,
            },
            sale,
        }
    }

    /// Whether the "mixed" choice may be offered.
    pub fn mixed_available(&self) -> bool {
        self.mixed.enabled && self.catalog.types.len() >= 2
    }
}

fn sale_rule(
    record: &ProductRecord,
    policy: &PricingPolicy,
    sink: &dyn DiagnosticSink,
) -> Option<SaleRule> {
    match record.sale_type? {
        SaleType::Percentage => {
            let raw = record.sale_value.as_ref()?;
            match raw.parse() {
                Ok(Some(percent)) if (0.0..=100.0).contains(&percent) => {
                    Some(SaleRule::PercentageOff(percent))
                }
                Ok(None) => None,
                Ok(Some(percent)) => {
                    report_invalid_sale_value(sink, percent.to_string());
                    None
                }
                Err(text) => {
                    report_invalid_sale_value(sink, text);
                    None
                }
            }
        }
        SaleType::Fixed => {
            let raw = record.sale_value.clone().map(RawPrice::Plain);
            policy
                .try_normalize(raw.as_ref(), PriceRole::OptionExtra, "saleValue", sink)
                .map(SaleRule::AmountOff)
        }
        SaleType::Unknown => None,
    }
}

fn report_invalid_sale_value(sink: &dyn DiagnosticSink, raw: String) {
    sink.emit(Diagnostic::InvalidPrice {
        field: "saleValue".to_string(),
        raw,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{NullSink, RecordingSink};

    fn parse(json: &str) -> ProductRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_record_from_catalog_json() {
        let record = parse(
            r#"{
                "id": "truffle-box",
                "name": "Truffle Box",
                "basePrice": 1500,
                "sizes": [{"id": "small", "name": "Small Box (4 pieces)", "price": 0}],
                "typeOptions": "[{\"id\":\"milk\",\"name\":\"Milk\"},{\"id\":\"dark\",\"name\":\"Dark\",\"price\":300}]",
                "mixedTypeEnabled": true,
                "saleActive": false,
                "saleEndDate": "2026-12-24"
            }"#,
        );

        assert_eq!(record.id.as_str(), "truffle-box");
        assert!(record.enable_mixed_slider);
        assert!(matches!(record.sizes, Some(OptionSource::Typed(_))));
        assert!(matches!(record.type_options, Some(OptionSource::Serialized(_))));
        assert!(record.sale_end_date.is_some());
    }

    #[test]
    fn test_resolve_product() {
        let record = parse(
            r#"{
                "id": "truffle-box",
                "name": "Truffle Box",
                "basePrice": 1500,
                "types": [{"id": "milk", "name": "Milk"}, {"id": "dark", "name": "Dark", "price": 300}],
                "mixedTypeEnabled": true,
                "mixedTypeFee": 1,
                "images": ["box.jpg"]
            }"#,
        );
        let product = Product::resolve(&record, &PricingPolicy::default(), &NullSink);

        assert_eq!(product.base_price, Money::new(1500));
        assert_eq!(product.catalog.types[1].extra_price, Money::new(300));
        assert_eq!(product.mixed.fee, Money::new(100));
        assert_eq!(product.image.as_deref(), Some("box.jpg"));
        assert!(product.mixed_available());
        assert!(product.catalog.sizes[0].is_none());
    }

    #[test]
    fn test_mixed_requires_two_types() {
        let record = parse(
            r#"{"id": "bar", "basePrice": 5, "types": [{"id": "dark"}], "mixedTypeEnabled": true}"#,
        );
        let product = Product::resolve(&record, &PricingPolicy::default(), &NullSink);
        assert!(!product.mixed_available());
    }

    #[test]
    fn test_sale_fields() {
        let record = parse(
            r#"{"id": "p", "basePrice": 1500, "saleActive": true, "saleType": "percentage",
                "saleValue": "20", "salePrice": 1200}"#,
        );
        let product = Product::resolve(&record, &PricingPolicy::default(), &NullSink);
        assert_eq!(product.sale.price, Some(Money::new(1200)));
        assert_eq!(product.sale.rule, Some(SaleRule::PercentageOff(20.0)));
    }

    #[test]
    fn test_fixed_sale_rule() {
        let record = parse(
            r#"{"id": "p", "basePrice": 1500, "saleActive": true, "saleType": "fixed",
                "saleValue": 250}"#,
        );
        let product = Product::resolve(&record, &PricingPolicy::default(), &NullSink);
        assert_eq!(product.sale.rule, Some(SaleRule::AmountOff(Money::new(250))));
        assert_eq!(product.sale.sale_price(product.base_price), Some(Money::new(1250)));
    }

    #[test]
    fn test_invalid_sale_fields_are_absent() {
        let record = parse(
            r#"{"id": "p", "basePrice": 1500, "saleActive": true, "salePrice": -3,
                "saleType": "fixed", "saleValue": "half off"}"#,
        );
        let sink = RecordingSink::new();
        let product = Product::resolve(&record, &PricingPolicy::default(), &sink);

        assert_eq!(product.sale.price, None);
        assert_eq!(product.sale.rule, None);
        assert_eq!(product.sale.sale_price(product.base_price), None);
        assert_eq!(sink.kinds(), vec!["invalid_price", "invalid_price"]);
    }

    #[test]
    fn test_out_of_range_percentage_is_absent() {
        let record = parse(
            r#"{"id": "p", "basePrice": 1500, "saleActive": true, "saleType": "percentage",
                "saleValue": 150}"#,
        );
        let sink = RecordingSink::new();
        let product = Product::resolve(&record, &PricingPolicy::default(), &sink);

        assert_eq!(product.sale.rule, None);
        assert_eq!(sink.kinds(), vec!["invalid_price"]);
    }

    #[test]
    fn test_bad_fields_degrade() {
        let record = parse(
            r#"{"id": 17, "basePrice": "call us", "saleType": "bogo", "saleStartDate": "soon"}"#,
        );
        let sink = RecordingSink::new();
        let product = Product::resolve(&record, &PricingPolicy::default(), &sink);

        assert_eq!(product.id.as_str(), "17");
        assert_eq!(product.base_price, Money::zero());
        assert_eq!(product.sale.rule, None);
        assert_eq!(product.sale.starts_at, None);
        assert!(sink.kinds().contains(&"invalid_price"));
    }
}
