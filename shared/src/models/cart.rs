//! Cart Model

use serde::{Deserialize, Serialize};

/// Cart entity
///
/// One open cart per user, created lazily on first access and never
/// deleted; clearing a cart only removes its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub cart_id: i64,
    pub user_id: i64,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart line item
///
/// Carries no price: cart pricing is always read live from the catalog.
/// Unique per (cart, product).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub cart_item_id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}
