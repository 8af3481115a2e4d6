//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod quote;

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use truffle_commerce::catalog::ProductSource;
use truffle_commerce::configurator::Configurator;
use truffle_commerce::Engine;

use crate::context::Context;

/// Product and option choices shared by `quote` and `cart add`.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Product id.
    pub product: String,

    /// Size option id.
    #[arg(short, long)]
    pub size: Option<String>,

    /// Single chocolate type id.
    #[arg(short = 't', long = "type", conflicts_with = "mix")]
    pub chocolate_type: Option<String>,

    /// Blend two types, e.g. `milk,dark`.
    #[arg(short, long, value_name = "TYPE1,TYPE2")]
    pub mix: Option<String>,

    /// Percent of the box given to the first mixed type.
    #[arg(short, long, default_value_t = 50.0, requires = "mix")]
    pub ratio: f64,

    /// Shape option id.
    #[arg(long)]
    pub shape: Option<String>,

    /// Number of boxes.
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,
}

impl SelectionArgs {
    /// Split `--mix` into its two type ids.
    pub fn mix_pair(&self) -> Result<Option<(&str, &str)>> {
        let Some(mix) = self.mix.as_deref() else {
            return Ok(None);
        };
        match mix.split_once(',') {
            Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
                Ok(Some((a.trim(), b.trim())))
            }
            _ => bail!("--mix expects two type ids separated by a comma, got '{}'", mix),
        }
    }

    /// Load the product and apply every selection to a configurator.
    pub fn configure(&self, engine: &Engine, ctx: &Context) -> Result<Configurator> {
        let mix = self.mix_pair()?;
        if self.quantity == 0 {
            bail!("--quantity must be at least 1");
        }

        let mut configurator = Configurator::new(engine.clone(), self.product.as_str());
        let record = ctx
            .product_source()
            .fetch(configurator.product_id())
            .with_context(|| format!("Failed to load product '{}'", self.product))?;
        configurator.apply_fetched(&record);

        if let Some(size) = &self.size {
            configurator.select_size(size.as_str());
        }
        if let Some(kind) = &self.chocolate_type {
            configurator.select_type(kind.as_str());
        }
        if let Some((type1, type2)) = mix {
            configurator.set_ratio(self.ratio);
            if !configurator.select_mixed(type1, type2) {
                ctx.output.warn(&format!(
                    "'{}' does not offer mixed boxes; pricing the default type",
                    self.product
                ));
            }
        }
        if let Some(shape) = &self.shape {
            configurator.select_shape(shape.as_str());
        }
        configurator.set_quantity(self.quantity);

        Ok(configurator)
    }
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a configured product to the cart.
    Add(SelectionArgs),
    /// List cart lines.
    List,
    /// Add one to a line.
    Inc {
        /// Line number from `cart list`.
        line: usize,
    },
    /// Take one from a line; a line at one is removed.
    Dec {
        /// Line number from `cart list`.
        line: usize,
    },
    /// Remove a line.
    Remove {
        /// Line number from `cart list`.
        line: usize,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        selection: SelectionArgs,
    }

    fn parse(args: &[&str]) -> Result<SelectionArgs, clap::Error> {
        let argv = std::iter::once("truffle").chain(args.iter().copied());
        Harness::try_parse_from(argv).map(|h| h.selection)
    }

    #[test]
    fn test_mix_pair() {
        let args = parse(&["truffle-box", "--mix", "milk, dark", "--ratio", "25"]).unwrap();
        assert_eq!(args.mix_pair().unwrap(), Some(("milk", "dark")));
        assert_eq!(args.ratio, 25.0);

        let bad = parse(&["truffle-box", "--mix", "milk"]).unwrap();
        assert!(bad.mix_pair().is_err());
    }

    #[test]
    fn test_type_conflicts_with_mix() {
        assert!(parse(&["truffle-box", "--type", "dark", "--mix", "milk,dark"]).is_err());
        assert!(parse(&["truffle-box", "--ratio", "30"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["truffle-box"]).unwrap();
        assert_eq!(args.quantity, 1);
        assert_eq!(args.mix_pair().unwrap(), None);
    }
}
