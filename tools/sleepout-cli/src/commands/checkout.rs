//! Checkout commands.
//!
//! Orders are prepared here but never posted; sending them is left to
//! whatever implements `OrderGateway` for the deployment.

use std::fs;

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use serde::Serialize;
use sleepout_commerce::checkout::{BuyerDetails, FieldError, Order, OrderTotals};
use sleepout_commerce::CommerceError;

use super::{CheckoutArgs, CheckoutCommand};
use crate::context::Context;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(CheckoutCommand::Summary) {
        CheckoutCommand::Summary => show_summary(ctx),
        CheckoutCommand::Validate { buyer } => validate_buyer(&buyer, ctx),
        CheckoutCommand::Order { buyer } => show_order(&buyer, ctx),
    }
}

fn show_summary(ctx: &Context) -> Result<()> {
    let cart = ctx.cart_store()?.load();
    let totals = OrderTotals::for_cart(&cart, &ctx.config.checkout)?;

    if ctx.output.is_json() {
        ctx.output.json(&totals);
        return Ok(());
    }

    ctx.output.header("Order Summary");
    ctx.output.kv("Items", &totals.item_count.to_string());
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    ctx.output.kv("Shipping", &totals.shipping.display());
    ctx.output.kv(
        &format!("Tax ({}%)", ctx.config.checkout.tax_rate * 100.0),
        &totals.tax.display(),
    );
    ctx.output.kv("Order Total", &totals.grand_total.display());

    Ok(())
}

fn validate_buyer(path: &str, ctx: &Context) -> Result<()> {
    let buyer = read_buyer(path, ctx)?;

    match buyer.validate(Utc::now().date_naive()) {
        Ok(()) => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "valid": true }));
            } else {
                ctx.output.success("Buyer details are valid");
            }
            Ok(())
        }
        Err(errors) => {
            report_field_errors(&errors, ctx);
            bail!(CommerceError::InvalidBuyer(errors))
        }
    }
}

#[derive(Serialize)]
struct PreparedOrder<'a> {
    url: String,
    order: &'a Order,
}

fn show_order(path: &str, ctx: &Context) -> Result<()> {
    let buyer = read_buyer(path, ctx)?;
    let now = Utc::now();

    if let Err(errors) = buyer.validate(now.date_naive()) {
        report_field_errors(&errors, ctx);
        bail!(CommerceError::InvalidBuyer(errors));
    }

    let cart = ctx.cart_store()?.load();
    if cart.is_empty() {
        bail!(CommerceError::EmptyCart);
    }

    let totals = OrderTotals::for_cart(&cart, &ctx.config.checkout)?;
    let order = Order::package(&buyer, &cart, &totals, now);
    let url = ctx.config.api.checkout_url();

    if ctx.output.is_json() {
        ctx.output.json(&PreparedOrder { url, order: &order });
        return Ok(());
    }

    ctx.output.header(&format!("POST {}", url));
    ctx.output.json(&order);
    ctx.output.info(&format!(
        "Timeout {} ms; the cart is kept until the order is accepted.",
        ctx.config.api.timeout_ms
    ));

    Ok(())
}

fn read_buyer(path: &str, ctx: &Context) -> Result<BuyerDetails> {
    let path = ctx.resolve_path(path);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read buyer file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid buyer details: {}", path.display()))
}

fn report_field_errors(errors: &[FieldError], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&errors);
        return;
    }
    for error in errors {
        ctx.output.warn(&format!("{}: {}", error.field, error.message));
    }
}
