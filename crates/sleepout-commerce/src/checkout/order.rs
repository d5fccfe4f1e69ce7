//! The order payload posted to the order service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{effective_unit_price, Cart};
use crate::checkout::{BuyerDetails, OrderTotals};
use crate::ids::{OrderId, ProductId};

/// An order, shaped the way the order service expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_date: DateTime<Utc>,
    pub fname: String,
    pub lname: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub card_number: String,
    pub expiration: String,
    pub code: String,
    pub items: Vec<OrderLineItem>,
    pub order_total: f64,
    pub shipping: f64,
    pub tax: f64,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub id: ProductId,
    pub name: String,
    /// Charged unit price.
    pub price: f64,
    pub quantity: u32,
}

impl Order {
    /// Assemble an order from the buyer, the cart and its totals.
    pub fn package(
        buyer: &BuyerDetails,
        cart: &Cart,
        totals: &OrderTotals,
        order_date: DateTime<Utc>,
    ) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|item| OrderLineItem {
                id: item.id.clone(),
                name: item.name.clone(),
                price: effective_unit_price(item),
                quantity: item.quantity,
            })
            .collect();

        Self {
            order_date,
            fname: buyer.first_name.trim().to_string(),
            lname: buyer.last_name.trim().to_string(),
            street: buyer.street.trim().to_string(),
            city: buyer.city.trim().to_string(),
            state: buyer.state.trim().to_string(),
            zip: buyer.zip.trim().to_string(),
            card_number: buyer.card_number.split_whitespace().collect(),
            expiration: buyer.expiration.trim().to_string(),
            code: buyer.code.trim().to_string(),
            items,
            order_total: totals.grand_total.to_decimal(),
            shipping: totals.shipping.to_decimal(),
            tax: totals.tax.to_decimal(),
        }
    }
}

/// What the order service answers for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Order number, when the service supplied one.
    pub order_id: Option<OrderId>,
}
