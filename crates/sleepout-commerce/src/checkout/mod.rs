//! Checkout module.
//!
//! Buyer validation, order totals, the order payload and its submission.

mod buyer;
mod order;
mod submit;
mod totals;

pub use buyer::{validate_expiration, BuyerDetails, FieldError};
pub use order::{Order, OrderConfirmation, OrderLineItem};
pub use submit::{place_order, submit_order, GatewayResponse, OrderGateway};
pub use totals::OrderTotals;
