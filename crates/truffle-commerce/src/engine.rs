//! Entry point tying policy and diagnostics to the pricing functions.

use std::sync::Arc;

use crate::cart::{compose_line, ComposedLine};
use crate::catalog::{Product, ProductRecord, ProductSource};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::pricing::{quote, PricingPolicy, Quote, Selection};

/// Pricing engine. Cheap to clone; clones share the diagnostic sink.
#[derive(Clone)]
pub struct Engine {
    policy: PricingPolicy,
    sink: Arc<dyn DiagnosticSink>,
}

impl Engine {
    pub fn new(policy: PricingPolicy, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { policy, sink }
    }

    /// Engine that reports fallbacks through `tracing`.
    pub fn with_tracing(policy: PricingPolicy) -> Self {
        Self::new(policy, Arc::new(TracingSink))
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn sink(&self) -> Arc<dyn DiagnosticSink> {
        Arc::clone(&self.sink)
    }

    /// Resolve a raw record into a priced product.
    pub fn resolve(&self, record: &ProductRecord) -> Product {
        Product::resolve(record, &self.policy, self.sink.as_ref())
    }

    /// Fetch and resolve a product.
    pub fn load(
        &self,
        source: &dyn ProductSource,
        id: &ProductId,
    ) -> Result<Product, CommerceError> {
        let record = source.fetch(id)?;
        Ok(self.resolve(&record))
    }

    pub fn quote(&self, product: &Product, selection: &Selection) -> Quote {
        quote(product, selection, &self.policy, self.sink.as_ref())
    }

    /// Quote a selection and build its cart line.
    pub fn compose(
        &self,
        product: &Product,
        selection: &Selection,
        quantity: u32,
    ) -> Result<ComposedLine, CommerceError> {
        let quote = self.quote(product, selection);
        compose_line(product, &quote, quantity)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_tracing(PricingPolicy::default())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemorySource;
    use crate::diagnostics::RecordingSink;
    use crate::money::Money;
    use crate::pricing::RawPrice;

    #[test]
    fn test_load_and_quote() {
        let sink = Arc::new(RecordingSink::new());
        let engine = Engine::new(PricingPolicy::default(), sink.clone());
        let source: InMemorySource = [ProductRecord::new("bar", "Dark Bar", RawPrice::plain(450.0))]
            .into_iter()
            .collect();

        let product = engine.load(&source, &ProductId::new("bar")).unwrap();
        let q = engine.quote(&product, &Selection::new());
        assert_eq!(q.unit_price, Money::new(450));
        // No options on the record: all three catalogs default.
        assert_eq!(
            sink.kinds(),
            vec![
                "catalog_defaulted",
                "catalog_defaulted",
                "catalog_defaulted",
                "piece_count_defaulted"
            ]
        );
    }

    #[test]
    fn test_load_missing_product() {
        let engine = Engine::default();
        let result = engine.load(&InMemorySource::new(), &ProductId::new("nope"));
        assert!(matches!(result, Err(CommerceError::ProductNotFound(_))));
    }
}
