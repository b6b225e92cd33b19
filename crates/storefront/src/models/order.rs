//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aroura_core::{CartLine, Email, OrderId, OrderStatus, Price};

/// Shipping and contact details captured at checkout.
///
/// The email is resolved at checkout time (session identity, or the form
/// field for guest checkout) and is the key for order history lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub email: Email,
}

/// A checkout order (domain type).
///
/// Created as `Pending` when the gateway order is opened; promoted to
/// `Completed` on verified payment. Line items are the cart-line snapshots
/// frozen at checkout time.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartLine>,
    pub total: Price,
    pub shipping: ShippingInfo,
    /// Gateway-side order identifier, unique per order.
    pub razorpay_order_id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Input for creating a pending order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<CartLine>,
    pub total: Price,
    pub shipping: ShippingInfo,
    pub razorpay_order_id: String,
}
