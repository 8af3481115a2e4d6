//! Selection state for the product being configured.
//!
//! Every change re-prices immediately. Fetch results are matched against the
//! current product id so that a slow response for a product the shopper has
//! already left cannot overwrite the one on screen.

use std::time::Instant;

use crate::cart::{compose_line, CartStore, Confirmation, MAX_QUANTITY_PER_ITEM};
use crate::catalog::{Product, ProductRecord};
use crate::control::QuantityControl;
use crate::diagnostics::Diagnostic;
use crate::engine::Engine;
use crate::error::CommerceError;
use crate::ids::{OptionId, ProductId};
use crate::pricing::{clamp_ratio, Quote, Selection, TypeChoice, FIXED_RATIO};

/// Configurator for one product at a time.
#[derive(Debug)]
pub struct Configurator {
    engine: Engine,
    product_id: ProductId,
    product: Option<Product>,
    selection: Selection,
    ratio: f64,
    quantity: u32,
    quote: Option<Quote>,
    increment: QuantityControl,
    decrement: QuantityControl,
}

impl Configurator {
    pub fn new(engine: Engine, product_id: impl Into<String>) -> Self {
        Self {
            engine,
            product_id: ProductId::new(product_id),
            product: None,
            selection: Selection::new(),
            ratio: FIXED_RATIO,
            quantity: 1,
            quote: None,
            increment: QuantityControl::default(),
            decrement: QuantityControl::default(),
        }
    }

    /// Switch to another product. Selections reset; data must be fetched again.
    pub fn navigate(&mut self, product_id: impl Into<String>) {
        self.product_id = ProductId::new(product_id);
        self.product = None;
        self.selection = Selection::new();
        self.ratio = FIXED_RATIO;
        self.quantity = 1;
        self.quote = None;
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The current price, once a product is loaded.
    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    /// Accept a fetched record if it belongs to the current product.
    ///
    /// Returns false when the record was stale and discarded.
    pub fn apply_fetched(&mut self, record: &ProductRecord) -> bool {
        if record.id != self.product_id {
            self.engine.sink().emit(Diagnostic::StaleProductDiscarded {
                expected: self.product_id.to_string(),
                received: record.id.to_string(),
            });
            return false;
        }

        self.product = Some(self.engine.resolve(record));
        self.reprice();
        true
    }

    /// Whether the "mixed" type choice should be shown.
    pub fn mixed_offered(&self) -> bool {
        self.product.as_ref().is_some_and(Product::mixed_available)
    }

    /// Whether the ratio slider should be shown.
    pub fn slider_offered(&self) -> bool {
        self.mixed_offered()
            && self
                .product
                .as_ref()
                .is_some_and(|p| p.mixed.slider_enabled)
    }

    pub fn select_size(&mut self, id: impl Into<String>) {
        self.selection.size = Some(OptionId::new(id));
        self.reprice();
    }

    pub fn select_type(&mut self, id: impl Into<String>) {
        self.selection.choice = Some(TypeChoice::Single {
            id: OptionId::new(id),
        });
        self.reprice();
    }

    /// Choose a blend of two types at the current ratio.
    ///
    /// Ignored, returning false, when the product does not offer mixing.
    pub fn select_mixed(&mut self, type1: impl Into<String>, type2: impl Into<String>) -> bool {
        if !self.mixed_offered() {
            return false;
        }
        self.selection.choice = Some(TypeChoice::Mixed {
            type1: OptionId::new(type1),
            type2: OptionId::new(type2),
            ratio: self.ratio,
        });
        self.reprice();
        true
    }

    /// Move the blend slider. Values are clamped to 0..=100.
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = clamp_ratio(ratio);
        if let Some(TypeChoice::Mixed { ratio, .. }) = &mut self.selection.choice {
            *ratio = self.ratio;
        }
        self.reprice();
    }

    pub fn select_shape(&mut self, id: impl Into<String>) {
        self.selection.shape = Some(OptionId::new(id));
        self.reprice();
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(1, MAX_QUANTITY_PER_ITEM);
    }

    /// Increment from a tap at `now`. Returns false if the tap was debounced.
    pub fn increment_at(&mut self, now: Instant) -> bool {
        if !self.increment.try_trigger_at(now) {
            return false;
        }
        self.set_quantity(self.quantity.saturating_add(1));
        true
    }

    /// Decrement from a tap at `now`. Quantity never drops below one.
    pub fn decrement_at(&mut self, now: Instant) -> bool {
        if !self.decrement.try_trigger_at(now) {
            return false;
        }
        self.set_quantity(self.quantity.saturating_sub(1));
        true
    }

    /// Compose the current configuration and merge it into the cart.
    pub fn add_to_cart(&self, store: &mut CartStore) -> Result<Confirmation, CommerceError> {
        let (Some(product), Some(quote)) = (&self.product, &self.quote) else {
            return Err(CommerceError::ProductNotLoaded(self.product_id.to_string()));
        };
        let line = compose_line(product, quote, self.quantity)?;
        store.add(line)
    }

    fn reprice(&mut self) {
        self.quote = self
            .product
            .as_ref()
            .map(|product| self.engine.quote(product, &self.selection));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::money::Money;
    use crate::pricing::PricingPolicy;
    use std::sync::Arc;
    use std::time::Duration;
    use truffle_cache::Cache;

    fn record(id: &str) -> ProductRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Truffle Box",
            "basePrice": 1500,
            "sizes": [{"id": "six", "name": "Box", "quantity": 6}],
            "types": [{"id": "milk", "name": "Milk"}, {"id": "dark", "name": "Dark", "price": 300}],
            "shapes": [{"id": "none", "name": "Regular"}, {"id": "round", "name": "Round"}],
            "mixedTypeEnabled": true
        }))
        .unwrap()
    }

    fn configurator(id: &str) -> (Configurator, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let engine = Engine::new(PricingPolicy::default(), sink.clone());
        (Configurator::new(engine, id), sink)
    }

    #[test]
    fn test_reprices_on_every_change() {
        let (mut c, _) = configurator("truffle-box");
        assert!(c.quote().is_none());

        assert!(c.apply_fetched(&record("truffle-box")));
        assert_eq!(c.quote().unwrap().unit_price, Money::new(1500));

        c.select_type("dark");
        assert_eq!(c.quote().unwrap().unit_price, Money::new(1800));

        assert!(c.select_mixed("milk", "dark"));
        assert_eq!(c.quote().unwrap().unit_price, Money::new(1650));

        c.set_ratio(0.0);
        assert_eq!(c.quote().unwrap().unit_price, Money::new(1800));

        c.set_ratio(250.0);
        assert_eq!(c.ratio(), 100.0);
        assert_eq!(c.quote().unwrap().unit_price, Money::new(1500));
    }

    #[test]
    fn test_stale_fetch_discarded() {
        let (mut c, sink) = configurator("truffle-box");
        c.navigate("caramels");

        assert!(!c.apply_fetched(&record("truffle-box")));
        assert!(c.product().is_none());
        assert_eq!(sink.kinds(), vec!["stale_product_discarded"]);

        assert!(c.apply_fetched(&record("caramels")));
        assert_eq!(c.product().unwrap().id.as_str(), "caramels");
    }

    #[test]
    fn test_mixed_not_offered_with_one_type() {
        let (mut c, _) = configurator("bar");
        let single: ProductRecord = serde_json::from_value(serde_json::json!({
            "id": "bar", "basePrice": 500, "types": [{"id": "dark"}], "mixedTypeEnabled": true
        }))
        .unwrap();
        c.apply_fetched(&single);

        assert!(!c.mixed_offered());
        assert!(!c.select_mixed("dark", "milk"));
        assert_eq!(c.quote().unwrap().type_id(), "dark");
    }

    #[test]
    fn test_quantity_steps_are_debounced() {
        let (mut c, _) = configurator("truffle-box");
        let t0 = Instant::now();

        assert!(c.increment_at(t0));
        assert!(!c.increment_at(t0 + Duration::from_millis(100)));
        assert_eq!(c.quantity(), 2);

        assert!(c.decrement_at(t0 + Duration::from_millis(100)));
        assert!(c.decrement_at(t0 + Duration::from_millis(400)));
        assert_eq!(c.quantity(), 1);
    }

    #[test]
    fn test_add_to_cart() {
        let (mut c, _) = configurator("truffle-box");
        let mut store = CartStore::new(Cache::in_memory(), Arc::new(RecordingSink::new()));

        assert!(matches!(
            c.add_to_cart(&mut store),
            Err(CommerceError::ProductNotLoaded(_))
        ));

        c.apply_fetched(&record("truffle-box"));
        c.select_mixed("milk", "dark");
        c.select_shape("round");
        c.set_quantity(2);

        let confirmation = c.add_to_cart(&mut store).unwrap();
        assert_eq!(
            confirmation.message,
            "2 × Truffle Box (3 Milk + 3 Dark) - Round added to your cart"
        );
        assert_eq!(store.pricing().unwrap().subtotal, Money::new(3300));
    }
}
