//! Order totals: subtotal, flat shipping, tax.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::config::CheckoutConfig;
use crate::error::CommerceError;
use crate::money::Money;

/// Complete pricing breakdown for an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    /// Sum of line totals at effective unit prices.
    pub subtotal: Money,
    /// Flat shipping; zero for an empty cart.
    pub shipping: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// subtotal + shipping + tax.
    pub grand_total: Money,
    /// Units across all lines.
    pub item_count: u64,
}

impl OrderTotals {
    /// Price `cart` under `config`.
    pub fn for_cart(cart: &Cart, config: &CheckoutConfig) -> Result<Self, CommerceError> {
        let currency = config.currency;
        let subtotal = cart.total(currency);

        let shipping = if subtotal.is_positive() {
            Money::from_decimal(config.shipping_rate, currency)
        } else {
            Money::zero(currency)
        };
        let tax = subtotal.multiply_rate(config.tax_rate);

        let grand_total = Money::try_sum([subtotal, shipping, tax].iter(), currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            subtotal,
            shipping,
            tax,
            grand_total,
            item_count: cart.item_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductRecord;

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add_item(&ProductRecord::new("a", "A", 100.0).with_final_price(80.0), 2)
            .unwrap();
        cart.add_item(&ProductRecord::new("b", "B", 50.0), 1).unwrap();

        let totals = OrderTotals::for_cart(&cart, &CheckoutConfig::default()).unwrap();
        assert_eq!(totals.subtotal.amount_cents, 21000);
        assert_eq!(totals.shipping.amount_cents, 1000);
        assert_eq!(totals.tax.amount_cents, 1470);
        assert_eq!(totals.grand_total.amount_cents, 23470);
        assert_eq!(totals.item_count, 3);
    }

    #[test]
    fn test_empty_cart_has_no_shipping() {
        let totals = OrderTotals::for_cart(&Cart::new(), &CheckoutConfig::default()).unwrap();
        assert!(totals.shipping.is_zero());
        assert!(totals.grand_total.is_zero());
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let mut cart = Cart::new();
        cart.add_item(&ProductRecord::new("a", "A", 0.5), 1).unwrap();

        // 7% of $0.50 is 3.5 cents
        let totals = OrderTotals::for_cart(&cart, &CheckoutConfig::default()).unwrap();
        assert_eq!(totals.tax.amount_cents, 4);
    }
}
