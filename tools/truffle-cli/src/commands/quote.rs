//! Price a configuration without touching the cart.

use anyhow::{Context as _, Result};
use serde_json::json;
use truffle_commerce::pricing::QuotedType;

use super::QuoteArgs;
use crate::context::Context;
use crate::output::price_tag;

/// Run the quote command.
pub fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let configurator = args.selection.configure(&engine, ctx)?;
    let quote = configurator
        .quote()
        .context("Product has not been loaded")?;
    let quantity = configurator.quantity();
    let line_total = quote
        .unit_price
        .try_multiply(i64::from(quantity))
        .context("Line total overflowed")?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "quote": quote,
            "quantity": quantity,
            "lineTotal": line_total,
        }));
        return Ok(());
    }

    let name = configurator
        .product()
        .map(|p| p.name.as_str())
        .unwrap_or_else(|| quote.product_id.as_str());
    ctx.output.header(name);

    ctx.output.kv("size", &format!("{} ({} pieces)", quote.size.label, quote.pieces));
    match &quote.flavor {
        QuotedType::Single(option) => ctx.output.kv("type", &option.label),
        QuotedType::Mixed(mixed) => {
            ctx.output.kv(
                "type",
                &format!("{} ({:.0}% {})", mixed.label, mixed.blend.ratio, mixed.type1.label),
            );
        }
    }
    if !quote.shape.is_none() {
        ctx.output.kv("shape", &quote.shape.label);
    }

    ctx.output.plain("");
    ctx.output.kv("base", &quote.base_price.display());
    for (label, amount) in [
        ("size", quote.size_extra),
        ("type", quote.type_extra),
        ("mixed fee", quote.mixed_fee),
        ("shape", quote.shape_extra),
    ] {
        if !amount.is_zero() {
            ctx.output.kv(&format!("+ {label}"), &amount.display());
        }
    }

    ctx.output.plain("");
    ctx.output.kv(
        "unit price",
        &price_tag(quote.unit_price, quote.regular_unit_price, quote.on_sale),
    );
    if quantity > 1 {
        ctx.output.kv(&format!("{quantity} boxes"), &line_total.display());
    }

    Ok(())
}
