//! Sending an order to the order service.
//!
//! The transport itself lives behind [`OrderGateway`]; this module owns the
//! rules around it: one request per attempt, a caller-supplied timeout, and
//! the mapping from responses to a confirmation or a failure message.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Deserialize;
use sleepout_cache::KeyValueStore;
use tracing::{info, instrument, warn};

use crate::cart::CartStore;
use crate::checkout::{BuyerDetails, Order, OrderConfirmation, OrderTotals};
use crate::config::CheckoutConfig;
use crate::error::CommerceError;
use crate::ids::OrderId;

/// A raw response from the order service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport that posts an order and returns the service's answer.
///
/// Implementations report transport failures (connection refused, DNS, ...)
/// as `Err`; any HTTP answer, successful or not, is an `Ok` response.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn post_order(&self, order: &Order) -> Result<GatewayResponse, CommerceError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptedBody {
    order_id: Option<serde_json::Value>,
    id: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RejectedBody {
    message: Option<String>,
}

/// Post `order` once, giving up after `timeout`.
///
/// A 2xx answer yields a confirmation carrying `orderId` (or `id`) from the
/// body when present. Any other status fails with the body's `message`, or
/// `"Server error: <status>"` when there is none.
#[instrument(level = "debug", skip_all, fields(items = order.items.len()))]
pub async fn submit_order<G>(
    gateway: &G,
    order: &Order,
    timeout: Duration,
) -> Result<OrderConfirmation, CommerceError>
where
    G: OrderGateway + ?Sized,
{
    let response = tokio::time::timeout(timeout, gateway.post_order(order))
        .await
        .map_err(|_| {
            let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            CommerceError::CheckoutTimeout(ms)
        })??;

    if response.status.is_success() {
        let order_id = serde_json::from_str::<AcceptedBody>(&response.body)
            .ok()
            .and_then(|body| body.order_id.or(body.id))
            .and_then(|value| match value {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map(OrderId::new);

        if order_id.is_none() {
            warn!(status = %response.status, "order accepted without an order number");
        }
        return Ok(OrderConfirmation { order_id });
    }

    let message = serde_json::from_str::<RejectedBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Server error: {}", response.status.as_u16()));

    warn!(status = %response.status, %message, "order rejected");
    Err(CommerceError::CheckoutFailed(message))
}

/// Validate, package and submit the persisted cart, clearing it only once
/// the order service accepts the order.
#[instrument(skip_all)]
pub async fn place_order<S, G>(
    store: &CartStore<S>,
    gateway: &G,
    buyer: &BuyerDetails,
    config: &CheckoutConfig,
    timeout: Duration,
    now: DateTime<Utc>,
) -> Result<OrderConfirmation, CommerceError>
where
    S: KeyValueStore,
    G: OrderGateway + ?Sized,
{
    buyer
        .validate(now.date_naive())
        .map_err(CommerceError::InvalidBuyer)?;

    let cart = store.load();
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    let totals = OrderTotals::for_cart(&cart, config)?;
    let order = Order::package(buyer, &cart, &totals, now);
    let confirmation = submit_order(gateway, &order, timeout).await?;

    store.clear();
    info!(
        order_id = confirmation.order_id.as_ref().map(OrderId::as_str),
        total = %totals.grand_total,
        "order placed"
    );
    Ok(confirmation)
}
