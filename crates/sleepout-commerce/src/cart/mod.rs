//! Shopping cart module.
//!
//! Contains the cart and its line items, the pricing helper that decides
//! what each line costs, and the store that persists the cart and tells
//! listeners when it changes.

mod cart;
mod observer;
mod pricing;
mod store;

pub use cart::{Cart, LineItem};
pub use observer::{CartObservers, Subscription};
pub use pricing::{discount_percent, effective_unit_price, is_discounted, LineItemPricing, Priced};
pub use store::{CartStore, DEFAULT_CART_KEY};
