//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_file {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let pricing = &ctx.config.pricing;
    ctx.output.plain("");
    ctx.output.info("[pricing]");
    ctx.output.kv("base_cents_above", &pricing.base_cents_above.to_string());
    ctx.output.kv("extra_cents_min", &pricing.extra_cents_min.to_string());
    ctx.output.kv("extra_cents_max", &pricing.extra_cents_max.to_string());
    ctx.output.kv("default_pieces", &pricing.default_pieces.to_string());

    ctx.output.plain("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "products_dir",
        &ctx.resolve_path(&ctx.config.catalog.products_dir).display().to_string(),
    );

    ctx.output.plain("");
    ctx.output.info("[storage]");
    ctx.output.kv(
        "dir",
        &ctx.resolve_path(&ctx.config.storage.dir).display().to_string(),
    );
    ctx.output.kv("cart_key", &ctx.config.storage.cart_key);

    ctx.output.plain("");
    ctx.output.info("[away]");
    ctx.output.kv("enabled", &ctx.config.away.enabled.to_string());
    if !ctx.config.away.reason.is_empty() {
        ctx.output.kv("reason", &ctx.config.away.reason);
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("truffle.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
