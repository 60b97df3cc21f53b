//! Order Model
//!
//! Order rows, snapshot line items and the status state machine that
//! governs the delivery pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Status State Machine
// ============================================================================

/// Order lifecycle status
///
/// Main line: `PENDING_PAYMENT -> PAID -> IN_TRANSIT -> DELIVERED`, with
/// `CANCELLED` reachable from any non-terminal state. `DELIVERED` and
/// `CANCELLED` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    PendingPayment,
    Paid,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// True once the order can no longer change status
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The stage the delivery scheduler advances this status to, if any
    pub fn next_delivery_stage(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Paid => Some(OrderStatus::InTransit),
            OrderStatus::InTransit => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    /// Transition table for all status changes, manual or scheduled
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::PendingPayment, OrderStatus::Paid) => true,
            (OrderStatus::Paid, OrderStatus::InTransit) => true,
            (OrderStatus::InTransit, OrderStatus::Delivered) => true,
            // Cancel branch: any non-terminal state
            (from, OrderStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Human-readable label for status listings
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "Awaiting payment",
            OrderStatus::Paid => "Paid",
            OrderStatus::InTransit => "In transit",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// All statuses in pipeline order
    pub fn all() -> [OrderStatus; 5] {
        [
            OrderStatus::PendingPayment,
            OrderStatus::Paid,
            OrderStatus::InTransit,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string does not map to a known state
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_PAYMENT" => Ok(OrderStatus::PendingPayment),
            "PAID" => Ok(OrderStatus::Paid),
            "IN_TRANSIT" => Ok(OrderStatus::InTransit),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Delivery / Payment Methods
// ============================================================================

/// Delivery method chosen at transfer time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DeliveryMethod {
    Courier,
    PostalService,
    Pickup,
}

/// Payment method reported with payment confirmation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentMethod {
    Card,
    CashOnDelivery,
    BankTransfer,
}

// ============================================================================
// Entities
// ============================================================================

/// Order entity
///
/// Created only by the cart transfer engine. Everything except `status`,
/// the delivery fields and `updated_at` is immutable after creation; the
/// delivery fields themselves are writable only while PENDING_PAYMENT.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub contact_phone: String,
    pub delivery_method: DeliveryMethod,
    /// Optimistic concurrency counter, bumped on every mutation
    pub version: i64,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item with its price snapshot
///
/// `price_at_purchase` is fixed at transfer (or explicit recalculation)
/// time and never re-derived from the live catalog once the order has
/// left PENDING_PAYMENT.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Discounted net unit price snapshot
    pub price_at_purchase: f64,
}

/// Order with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderDetail {
    /// Sum of line totals over the snapshot prices
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.price_at_purchase * i.quantity as f64)
            .sum()
    }
}
