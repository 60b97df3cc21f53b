//! Shared types for the shop backend
//!
//! Domain models, status enums, DTOs and utility types used by the
//! server crate and its tests.

pub mod dto;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Model re-exports (for convenient access)
pub use models::{
    Cart, CartItem, DeliveryMethod, Order, OrderDetail, OrderItem, OrderStatus, PaymentMethod,
    Product, Role,
};

// DTO re-exports
pub use dto::{CartLineView, CartView, DeliveryDetails, OrderStatusDto, UpdateDeliveryDto};
