//! Product records read from a directory of JSON files.

use std::io::ErrorKind;
use std::path::PathBuf;

use truffle_cache::CacheError;
use truffle_commerce::catalog::{ProductRecord, ProductSource};
use truffle_commerce::{CommerceError, ProductId};

/// Reads `<dir>/<product-id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &ProductId) -> Option<PathBuf> {
        let id = id.as_str();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{id}.json")))
    }
}

impl ProductSource for DirectorySource {
    fn fetch(&self, id: &ProductId) -> Result<ProductRecord, CommerceError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;

        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CommerceError::ProductNotFound(id.to_string()),
            _ => CommerceError::Storage(CacheError::from(e)),
        })?;

        tracing::debug!(path = %path.display(), "product record read");
        Ok(serde_json::from_str(&content)?)
    }
}
