//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use truffle_cache::Cache;
use truffle_commerce::cart::CartStore;
use truffle_commerce::Engine;

use crate::config::{TruffleConfig, CONFIG_FILE_NAMES};
use crate::output::Output;
use crate::source::DirectorySource;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: TruffleConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Directory relative config paths resolve against.
    pub base_dir: PathBuf,
    /// File the config was read from, if any.
    pub config_file: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let found = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                Some((TruffleConfig::load(&path)?, path))
            }
            // Try to find config in current directory or parent directories
            None => Self::find_config(&cwd),
        };

        let (config, config_file) = match found {
            Some((config, path)) => {
                output.debug(&format!("Using config {}", path.display()));
                (config, Some(path))
            }
            None => (TruffleConfig::default(), None),
        };

        let base_dir = config_file
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        Ok(Self {
            config,
            output,
            cwd,
            base_dir,
            config_file,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(TruffleConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match TruffleConfig::load(&config_path) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => tracing::warn!(error = %format!("{e:#}"), "skipping config"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Pricing engine configured from `[pricing]`.
    pub fn engine(&self) -> Engine {
        Engine::with_tracing(self.config.pricing.clone())
    }

    /// Product records from `[catalog] products_dir`.
    pub fn product_source(&self) -> DirectorySource {
        DirectorySource::new(self.resolve_path(&self.config.catalog.products_dir))
    }

    /// The persisted cart from `[storage]`.
    pub fn cart_store(&self, engine: &Engine) -> Result<CartStore> {
        let dir = self.resolve_path(&self.config.storage.dir);
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        Ok(CartStore::new(cache, engine.sink()).with_key(&self.config.storage.cart_key))
    }

    /// Resolve a config path relative to the config file's directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.base_dir, path)
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
