//! Where product records come from.

use std::collections::HashMap;

use crate::catalog::ProductRecord;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Read-only access to product records keyed by id.
///
/// The storefront implements this over an HTTP GET; the CLI reads JSON
/// files from a directory.
pub trait ProductSource {
    fn fetch(&self, id: &ProductId) -> Result<ProductRecord, CommerceError>;
}

/// A fixed set of records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: HashMap<ProductId, ProductRecord>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ProductRecord) {
        self.records.insert(record.id.clone(), record);
    }
}

impl FromIterator<ProductRecord> for InMemorySource {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        let mut source = Self::new();
        for record in iter {
            source.insert(record);
        }
        source
    }
}

impl ProductSource for InMemorySource {
    fn fetch(&self, id: &ProductId) -> Result<ProductRecord, CommerceError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }
}
