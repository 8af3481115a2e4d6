//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use truffle_commerce::away::AwayMode;
use truffle_commerce::cart::CART_STORAGE_KEY;
use truffle_commerce::pricing::PricingPolicy;

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["truffle.toml", ".truffle.toml", "truffle.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TruffleConfig {
    /// Currency heuristic thresholds and piece defaults.
    #[serde(default)]
    pub pricing: PricingPolicy,

    /// Where product records are read from.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where the cart is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Store-wide order pause.
    #[serde(default)]
    pub away: AwayMode,
}

impl TruffleConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Product catalog location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding one `<product-id>.json` per product.
    #[serde(default = "default_products_dir")]
    pub products_dir: String,
}

fn default_products_dir() -> String {
    "products".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products_dir: default_products_dir(),
        }
    }
}

/// Cart storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted state.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Key the cart is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_storage_dir() -> String {
    ".truffle".to_string()
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Generate a default truffle.toml config file.
pub fn generate_default_config() -> String {
    r#"# Truffle configuration

[pricing]
# Untagged base prices above this are read as cents.
base_cents_above = 100.0
# Untagged option surcharges in [min, max) are read as cents.
extra_cents_min = 100.0
extra_cents_max = 500.0
# Pieces per box when a size names none.
default_pieces = 6

[catalog]
products_dir = "products"

[storage]
dir = ".truffle"
cart_key = "cart"

[away]
enabled = false
reason = ""
"#
    .to_string()
}
