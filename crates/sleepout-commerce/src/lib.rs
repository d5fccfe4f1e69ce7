//! Storefront domain types and logic for SleepOutside.
//!
//! This crate provides the pieces a storefront page needs around the cart:
//!
//! - **Catalog**: Product records in either key convention, images, sorting
//! - **Cart**: The persisted cart, its store, pricing helpers, observers
//! - **Checkout**: Buyer validation, order totals, order submission
//!
//! # Example
//!
//! ```rust
//! use sleepout_cache::MemoryStore;
//! use sleepout_commerce::prelude::*;
//!
//! let store = CartStore::new(MemoryStore::new());
//!
//! let tent = ProductRecord::new("tent-01", "Alpine Tent", 100.0).with_final_price(80.0);
//! store.add(&tent, 2).unwrap();
//! store.add(&tent, 1).unwrap();
//!
//! assert_eq!(store.count(), 3);
//! assert_eq!(store.total().display(), "$240.00");
//! assert_eq!(discount_percent(&tent), 20);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod config;

pub mod catalog;
pub mod cart;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{format_currency, format_currency_in, Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ApiConfig, CheckoutConfig, CommerceConfig, StorageConfig};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{format_currency, Currency, Money};

    // Catalog
    pub use crate::catalog::{sort_products, ImageSource, ProductRecord, SizedImages, SortOption};

    // Cart
    pub use crate::cart::{
        discount_percent, effective_unit_price, is_discounted, Cart, CartObservers, CartStore,
        LineItem, LineItemPricing, Priced, Subscription, DEFAULT_CART_KEY,
    };

    // Checkout
    pub use crate::checkout::{
        place_order, submit_order, BuyerDetails, FieldError, GatewayResponse, Order,
        OrderConfirmation, OrderGateway, OrderLineItem, OrderTotals,
    };
}
