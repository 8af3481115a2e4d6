//! Cart management commands.

use anyhow::{anyhow, Result};
use truffle_commerce::cart::{CartKey, CartStore};
use truffle_commerce::Engine;

use super::{CartArgs, CartCommand, SelectionArgs};
use crate::context::Context;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let mut store = ctx.cart_store(&engine)?;

    match args.command {
        Some(CartCommand::Add(selection)) => add(&selection, &engine, &mut store, ctx),
        Some(CartCommand::List) | None => list(&mut store, ctx),
        Some(CartCommand::Inc { line }) => {
            let key = line_key(&mut store, line)?;
            let quantity = store.increase(&key)?;
            ctx.output.success(&format!("Line {line} now has {quantity}"));
            Ok(())
        }
        Some(CartCommand::Dec { line }) => {
            let key = line_key(&mut store, line)?;
            match store.decrease(&key)? {
                Some(quantity) => ctx.output.success(&format!("Line {line} now has {quantity}")),
                None => ctx.output.success(&format!("Removed line {line}")),
            }
            Ok(())
        }
        Some(CartCommand::Remove { line }) => {
            let key = line_key(&mut store, line)?;
            store.remove(&key)?;
            ctx.output.success(&format!("Removed line {line}"));
            Ok(())
        }
        Some(CartCommand::Clear) => {
            store.clear()?;
            ctx.output.success("Cart cleared");
            Ok(())
        }
    }
}

fn add(
    selection: &SelectionArgs,
    engine: &Engine,
    store: &mut CartStore,
    ctx: &Context,
) -> Result<()> {
    let configurator = selection.configure(engine, ctx)?;
    let confirmation = configurator.add_to_cart(store)?;

    if ctx.output.is_json() {
        ctx.output.json(&confirmation);
    } else {
        ctx.output.success(&confirmation.message);
    }
    Ok(())
}

fn list(store: &mut CartStore, ctx: &Context) -> Result<()> {
    let pricing = store.pricing()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": store.items(),
            "pricing": pricing,
        }));
        return Ok(());
    }

    if pricing.lines.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    ctx.output.header("Cart");
    let widths = [3, 44, 5, 10, 10];
    ctx.output
        .table_row(&["#", "Item", "Qty", "Each", "Total"], &widths);

    let descriptions: Vec<String> = store.items().iter().map(|i| i.describe()).collect();
    for (index, (line, description)) in pricing.lines.iter().zip(&descriptions).enumerate() {
        ctx.output.table_row(
            &[
                &(index + 1).to_string(),
                description,
                &line.quantity.to_string(),
                &line.unit_price.display(),
                &line.total.display(),
            ],
            &widths,
        );
    }

    ctx.output.plain("");
    ctx.output.kv(
        &format!("Subtotal ({} items)", pricing.item_count),
        &pricing.subtotal.display(),
    );
    Ok(())
}

fn line_key(store: &mut CartStore, line: usize) -> Result<CartKey> {
    store
        .key_at(line)
        .ok_or_else(|| anyhow!("No line {} in the cart; see `truffle cart list`", line))
}
