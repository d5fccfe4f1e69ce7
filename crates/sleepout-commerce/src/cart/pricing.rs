//! Discount resolution and per-line pricing.
//!
//! Every monetary figure in the storefront goes through
//! [`effective_unit_price`]; nothing else decides which of a product's two
//! prices is charged.

use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::catalog::ProductRecord;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Anything that carries a list price and, optionally, a discounted price.
pub trait Priced {
    /// The undiscounted price.
    fn list_price(&self) -> Option<f64>;

    /// The discounted price, when there is one.
    fn final_price(&self) -> Option<f64>;
}

impl Priced for LineItem {
    fn list_price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn final_price(&self) -> Option<f64> {
        self.final_price
    }
}

impl Priced for ProductRecord {
    fn list_price(&self) -> Option<f64> {
        ProductRecord::list_price(self)
    }

    fn final_price(&self) -> Option<f64> {
        ProductRecord::final_price(self)
    }
}

fn valid(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// The unit price actually charged: the final price when present and
/// numeric, else the list price, else zero. Never NaN.
pub fn effective_unit_price<P: Priced + ?Sized>(item: &P) -> f64 {
    valid(item.final_price())
        .or_else(|| valid(item.list_price()))
        .unwrap_or(0.0)
}

/// Whether the charged price is strictly below the list price.
pub fn is_discounted<P: Priced + ?Sized>(item: &P) -> bool {
    match (valid(item.final_price()), valid(item.list_price())) {
        (Some(final_price), Some(list_price)) => final_price < list_price,
        _ => false,
    }
}

/// Percentage off the list price, rounded half away from zero, in 0..=100.
pub fn discount_percent<P: Priced + ?Sized>(item: &P) -> u8 {
    if !is_discounted(item) {
        return 0;
    }
    let Some(list_price) = valid(item.list_price()).filter(|p| *p > 0.0) else {
        return 0;
    };
    let percent = (100.0 * (1.0 - effective_unit_price(item) / list_price)).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Product the line is for.
    pub product_id: ProductId,
    /// Undiscounted unit price.
    pub list_price: Money,
    /// Charged unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: u32,
    /// unit_price * quantity.
    pub total: Money,
    /// Percent off the list price.
    pub discount_percent: u8,
}

impl LineItemPricing {
    /// Price a line item. The line total is unit price times quantity,
    /// rounded to cents once. Returns None if it does not fit in cents.
    pub fn for_item(item: &LineItem, currency: Currency) -> Option<Self> {
        let unit = effective_unit_price(item);
        let line = unit * f64::from(item.quantity);
        let scale = 10_f64.powi(currency.decimal_places() as i32);
        if (line * scale).round() >= i64::MAX as f64 {
            return None;
        }
        Some(Self {
            product_id: item.id.clone(),
            list_price: Money::from_decimal(item.price, currency),
            unit_price: Money::from_decimal(unit, currency),
            quantity: item.quantity,
            total: Money::from_decimal(line, currency),
            discount_percent: discount_percent(item),
        })
    }

    /// Savings against the list price across the whole line.
    pub fn savings(&self) -> Money {
        let per_unit = (self.list_price.amount_cents - self.unit_price.amount_cents).max(0);
        Money::new(
            per_unit.saturating_mul(i64::from(self.quantity)),
            self.unit_price.currency,
        )
    }
}
