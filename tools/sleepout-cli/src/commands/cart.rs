//! Cart commands.

use std::fs;

use anyhow::{Context as _, Result};
use serde::Serialize;
use sleepout_cache::FileStore;
use sleepout_commerce::cart::{Cart, CartStore, LineItemPricing};
use sleepout_commerce::catalog::ProductRecord;
use sleepout_commerce::money::Money;

use super::{AddArgs, CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{discount_badge, price_cell, truncate};

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let store = ctx.cart_store()?;

    match args.command.unwrap_or(CartCommand::List) {
        CartCommand::Add(add) => add_item(add, &store, ctx),
        CartCommand::Update { id, quantity } => update_item(&id, quantity, &store, ctx),
        CartCommand::Remove { id } => remove_item(&id, &store, ctx),
        CartCommand::List => list_items(&store, ctx),
        CartCommand::Total => show_total(&store, ctx),
        CartCommand::Count => show_count(&store, ctx),
        CartCommand::Clear => clear_cart(&store, ctx),
    }
}

fn add_item(args: AddArgs, store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    let product = match args.product {
        Some(ref path) => {
            let path = ctx.resolve_path(path);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read product file: {}", path.display()))?;
            ProductRecord::from_json(&content)
                .with_context(|| format!("Invalid product record: {}", path.display()))?
        }
        None => product_from_flags(&args),
    };

    store.add(&product, args.quantity)?;

    let name = product.name().unwrap_or("item");
    ctx.output.success(&format!("Added {} x {}", args.quantity, name));
    report_cart(store, ctx)
}

fn product_from_flags(args: &AddArgs) -> ProductRecord {
    let id = args.id.clone().unwrap_or_default();
    let name = args.name.clone().unwrap_or_else(|| id.clone());
    let mut product = ProductRecord::new(id, name, args.price.unwrap_or(0.0));
    if let Some(final_price) = args.final_price {
        product = product.with_final_price(final_price);
    }
    if let Some(ref category) = args.category {
        product = product.with_category(category.clone());
    }
    if let Some(ref image) = args.image {
        product = product.with_image(image.clone());
    }
    product
}

fn update_item(id: &str, quantity: i64, store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    if store.load().get_item(id).is_none() {
        ctx.output.warn(&format!("No line for '{}' in the cart", id));
        return Ok(());
    }

    store.update_quantity(id, quantity)?;
    ctx.output.success(&format!("Set {} to {}", id, quantity));
    report_cart(store, ctx)
}

fn remove_item(id: &str, store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    let present = store.load().get_item(id).is_some();
    store.remove(id);

    if present {
        ctx.output.success(&format!("Removed {}", id));
    } else {
        ctx.output.info(&format!("'{}' was not in the cart", id));
    }
    report_cart(store, ctx)
}

#[derive(Serialize)]
struct CartListing<'a> {
    items: &'a Cart,
    pricing: Vec<LineItemPricing>,
    count: u64,
    total: Money,
}

fn list_items(store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    let cart = store.load();
    let pricing = cart.pricing(store.currency())?;
    let total = cart.total(store.currency());

    if ctx.output.is_json() {
        ctx.output.json(&CartListing {
            items: &cart,
            count: cart.item_count(),
            pricing,
            total,
        });
        return Ok(());
    }

    ctx.output.header("Cart");

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let widths = [14, 28, 20, 5, 12, 6];
    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "QTY", "TOTAL", ""], &widths);
    for (item, line) in cart.items().iter().zip(&pricing) {
        let name = truncate(&item.name, 28);
        let price = price_cell(line);
        let quantity = line.quantity.to_string();
        let line_total = line.total.display();
        let badge = discount_badge(line.discount_percent);
        ctx.output.table_row(
            &[item.id.as_str(), &name, &price, &quantity, &line_total, &badge],
            &widths,
        );
    }

    println!();
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Total", &total.display());

    Ok(())
}

fn show_total(store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    let total = store.total();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "total": total.to_decimal(),
            "currency": total.currency.code(),
            "display": total.display(),
        }));
    } else {
        println!("{}", total.display());
    }
    Ok(())
}

fn show_count(store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    let count = store.count();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "count": count }));
    } else {
        println!("{}", count);
    }
    Ok(())
}

fn clear_cart(store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    store.clear();
    ctx.output.success("Cart cleared");
    Ok(())
}

/// Short state line after a mutation: units and total.
fn report_cart(store: &CartStore<FileStore>, ctx: &Context) -> Result<()> {
    let cart = store.load();
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "count": cart.item_count(),
            "total": cart.total(store.currency()).to_decimal(),
        }));
    } else {
        ctx.output.kv(
            "Cart",
            &format!(
                "{} item(s), {}",
                cart.item_count(),
                cart.total(store.currency()).display()
            ),
        );
    }
    Ok(())
}
