//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (catalog row)
///
/// The cart and order engine only reads `price` and `discount_percent`;
/// everything else about the catalog is managed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    /// Gross catalog price
    pub price: f64,
    /// Catalog discount in percent (0-100), None = no discount
    pub discount_percent: Option<f64>,
    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload (used for seeding and tests; catalog CRUD itself
/// lives outside this service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub discount_percent: Option<f64>,
}
