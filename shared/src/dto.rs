//! Request / view DTOs for the order and cart services

use crate::models::{DeliveryMethod, OrderStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Delivery details supplied explicitly at cart transfer time.
///
/// The transfer engine never infers these from profile state; callers
/// must pass them with the checkout request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeliveryDetails {
    #[validate(length(min = 1, max = 500))]
    pub delivery_address: String,
    #[validate(length(min = 3, max = 32))]
    pub contact_phone: String,
    pub delivery_method: DeliveryMethod,
}

/// Delivery-field update for an order still awaiting payment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDeliveryDto {
    #[validate(length(min = 1, max = 500))]
    pub delivery_address: String,
    #[validate(length(min = 3, max = 32))]
    pub contact_phone: String,
    pub delivery_method: DeliveryMethod,
}

/// Cart preview line with live catalog pricing
///
/// `unit_price` is the discounted catalog price at read time: a display
/// value, not a snapshot. Order pricing is fixed separately at transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Cart preview with derived total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: f64,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Status listing entry for admin tooling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusDto {
    pub status: OrderStatus,
    pub label: String,
}

impl From<OrderStatus> for OrderStatusDto {
    fn from(status: OrderStatus) -> Self {
        Self {
            status,
            label: status.label().to_string(),
        }
    }
}
