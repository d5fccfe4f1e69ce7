//! Commerce error types.

use thiserror::Error;

use crate::checkout::FieldError;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// The product handed to the cart has no usable id.
    #[error("Product has no resolvable id")]
    MissingProductId,

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart calculation")]
    Overflow,

    /// Checkout attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Buyer details failed validation.
    #[error("Please check your form for errors ({} invalid fields)", .0.len())]
    InvalidBuyer(Vec<FieldError>),

    /// The order service rejected the order or could not be reached.
    #[error("{0}")]
    CheckoutFailed(String),

    /// The order service did not answer in time.
    #[error("Order submission timed out after {0} ms")]
    CheckoutTimeout(u64),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
