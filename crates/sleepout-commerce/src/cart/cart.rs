//! Cart and line item types.

use std::collections::HashSet;

use crate::cart::{effective_unit_price, LineItemPricing};
use crate::catalog::{ImageSource, ProductRecord};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shopping cart: line items unique by product id.
///
/// Serializes as a bare JSON array of line items, which is the layout kept
/// in the cart storage slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a product.
    ///
    /// A product already in the cart has its quantity increased; otherwise a
    /// new line item is normalized from the record. Fails without touching
    /// the cart if the product has no id or the quantity is not positive.
    pub fn add_item(&mut self, product: &ProductRecord, quantity: i64) -> Result<(), CommerceError> {
        let quantity = positive_quantity(quantity)?;
        let id = product.id().ok_or(CommerceError::MissingProductId)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            return Ok(());
        }

        self.items.push(LineItem::from_product(product, quantity)?);
        Ok(())
    }

    /// Set the quantity of a line item.
    ///
    /// Returns `Ok(false)` if no line item has that id, and an error (with
    /// the cart unchanged) if the quantity is below one.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<bool, CommerceError> {
        let quantity = positive_quantity(quantity)?;
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a line item. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by product id.
    pub fn get_item(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Sum of effective unit price times quantity, converted to cents once
    /// for the whole cart.
    pub fn total(&self, currency: Currency) -> Money {
        let amount: f64 = self
            .items
            .iter()
            .map(|item| effective_unit_price(item) * f64::from(item.quantity))
            .sum();
        Money::from_decimal(amount, currency)
    }

    /// Per-line pricing breakdown.
    pub fn pricing(&self, currency: Currency) -> Result<Vec<LineItemPricing>, CommerceError> {
        self.items
            .iter()
            .map(|item| LineItemPricing::for_item(item, currency).ok_or(CommerceError::Overflow))
            .collect()
    }

    /// Check the invariants a persisted cart must satisfy: ids unique and
    /// non-empty, quantities at least one, prices finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.as_str().trim().is_empty() {
                return Err("line item with empty id".to_string());
            }
            if !seen.insert(item.id.as_str()) {
                return Err(format!("duplicate line item {}", item.id));
            }
            if item.quantity == 0 {
                return Err(format!("line item {} has quantity 0", item.id));
            }
            let mut prices = std::iter::once(item.price).chain(item.final_price);
            if prices.any(|p| !p.is_finite() || p < 0.0) {
                return Err(format!("line item {} has an invalid price", item.id));
            }
        }
        Ok(())
    }
}

fn positive_quantity(quantity: i64) -> Result<u32, CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    u32::try_from(quantity).map_err(|_| CommerceError::InvalidQuantity(quantity))
}

fn default_quantity() -> u32 {
    1
}

/// A line item in the cart, in the canonical key set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product id; unique within a cart.
    pub id: ProductId,
    /// Product name (denormalized for display).
    #[serde(default)]
    pub name: String,
    /// List price.
    pub price: f64,
    /// Charged price when discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageSource>,
    /// Units of the product; at least one.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item with quantity one.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
            final_price: None,
            category: None,
            image: None,
            images: None,
            quantity: 1,
        }
    }

    /// Normalize a product record, in whichever key convention it came,
    /// into a line item.
    ///
    /// A record with only a final price uses it as the list price too.
    pub fn from_product(product: &ProductRecord, quantity: u32) -> Result<Self, CommerceError> {
        let id = product.id().ok_or(CommerceError::MissingProductId)?;
        let final_price = product.final_price();
        let price = product.list_price().or(final_price).unwrap_or(0.0);

        Ok(Self {
            id,
            name: product.name().unwrap_or_default().to_string(),
            price,
            final_price,
            category: product.category().map(str::to_string),
            image: product.image().map(str::to_string),
            images: product.images().cloned(),
            quantity,
        })
    }

    /// Best image URL for display, if any.
    pub fn display_image(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(ImageSource::primary_url)
            .or(self.image.as_deref())
    }
}
