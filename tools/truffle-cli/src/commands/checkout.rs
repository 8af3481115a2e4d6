//! Checkout gate.

use anyhow::{bail, Result};
use serde_json::json;

use crate::context::Context;

/// Run the checkout command.
///
/// Payment is handled elsewhere; this only confirms the order is allowed
/// and reports what would be charged.
pub fn run(ctx: &Context) -> Result<()> {
    if let Some(reason) = ctx.config.away.blocks_checkout() {
        bail!("Checkout unavailable: {}", reason);
    }

    let engine = ctx.engine();
    let mut store = ctx.cart_store(&engine)?;
    let pricing = store.pricing()?;
    if pricing.lines.is_empty() {
        bail!("Your cart is empty");
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "itemCount": pricing.item_count,
            "total": pricing.subtotal,
        }));
        return Ok(());
    }

    ctx.output.header("Checkout");
    ctx.output.kv("items", &pricing.item_count.to_string());
    ctx.output.kv("total", &pricing.subtotal.display());
    ctx.output.success("Ready for payment");
    Ok(())
}
