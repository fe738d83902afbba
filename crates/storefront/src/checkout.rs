//! Order summary and checkout hand-off.
//!
//! The cart only knows its own total. Shipping, tax and the grand total are
//! derived here from a [`PricingPolicy`]; placing an order snapshots the cart
//! and then empties it through [`ShopState::clear_cart`](crate::state::ShopState::clear_cart).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use yasira_core::{CurrencyCode, Price};

use crate::cart::{Cart, CartLine};

/// Why an order could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// There is nothing to buy.
    #[error("cart is empty")]
    EmptyCart,

    /// Checkout requires a signed-in shopper.
    #[error("sign in to check out")]
    NotAuthenticated,
}

/// Shipping and tax rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged below the threshold.
    pub flat_shipping: Decimal,
    /// Tax as a fraction of the subtotal (e.g., 0.20 for 20% VAT).
    pub tax_rate: Decimal,
    /// Currency amounts are rendered in.
    pub currency: CurrencyCode,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(50, 0),
            flat_shipping: Decimal::new(599, 2),
            tax_rate: Decimal::new(20, 2),
            currency: CurrencyCode::EUR,
        }
    }
}

/// Amounts shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Cart total.
    pub subtotal: Price,
    /// Zero once the subtotal reaches the free-shipping threshold.
    pub shipping: Price,
    /// `subtotal × tax_rate`.
    pub tax: Price,
    /// `subtotal + shipping + tax`.
    pub total: Price,
    /// How much more would unlock free shipping; `None` once it applies.
    pub free_shipping_remaining: Option<Price>,
}

impl OrderSummary {
    /// Summarize a cart under `policy`.
    #[must_use]
    pub fn for_cart(cart: &Cart, policy: &PricingPolicy) -> Self {
        Self::for_subtotal(cart.total(), policy)
    }

    /// Summarize a bare subtotal under `policy`.
    #[must_use]
    pub fn for_subtotal(subtotal: Decimal, policy: &PricingPolicy) -> Self {
        let currency = policy.currency;
        let free = subtotal >= policy.free_shipping_threshold;
        let shipping = if free {
            Price::zero(currency)
        } else {
            Price::new(policy.flat_shipping, currency)
        };
        let tax = subtotal.saturating_mul(policy.tax_rate);
        let total = subtotal.saturating_add(shipping.amount).saturating_add(tax);

        Self {
            subtotal: Price::new(subtotal, currency),
            shipping,
            tax: Price::new(tax, currency),
            total: Price::new(total, currency),
            free_shipping_remaining: (!free).then(|| {
                Price::new(policy.free_shipping_threshold.saturating_sub(subtotal), currency)
            }),
        }
    }

    /// Whether shipping is free.
    #[must_use]
    pub const fn ships_free(&self) -> bool {
        self.free_shipping_remaining.is_none()
    }
}

/// Receipt for a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// `YB-<unix millis>`.
    pub order_number: String,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Lines as they were at checkout.
    pub lines: Vec<CartLine>,
    /// Amounts charged.
    pub summary: OrderSummary,
}

impl OrderConfirmation {
    pub(crate) fn new(cart: &Cart, policy: &PricingPolicy, placed_at: DateTime<Utc>) -> Self {
        Self {
            order_number: order_number(placed_at),
            placed_at,
            lines: cart.lines().to_vec(),
            summary: OrderSummary::for_cart(cart, policy),
        }
    }
}

/// Synthesize an order number from the placement time.
#[must_use]
pub fn order_number(placed_at: DateTime<Utc>) -> String {
    format!("YB-{}", placed_at.timestamp_millis())
}
