//! Product Repository
//!
//! Catalog lookups for the cart and pricing paths. Catalog management
//! itself is an external collaborator; `create` exists for seeding.

use super::{RepoError, RepoResult};
use shared::models::product::{Product, ProductCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, product_id: i64) -> RepoResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT product_id, name, price, discount_percent, created_at, updated_at
             FROM products WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Fetch a product or fail with NotFound
    pub async fn get(&self, product_id: i64) -> RepoResult<Product> {
        self.find_by_id(product_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {product_id} not found")))
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let now = now_millis();
        let product = Product {
            product_id: snowflake_id(),
            name: data.name,
            price: data.price,
            discount_percent: data.discount_percent,
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO products (product_id, name, price, discount_percent, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(product.product_id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.discount_percent)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(product)
    }

    /// Update live catalog pricing (price snapshots on orders are unaffected)
    pub async fn set_pricing(
        &self,
        product_id: i64,
        price: f64,
        discount_percent: Option<f64>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE products SET price = ?, discount_percent = ?, updated_at = ?
             WHERE product_id = ?",
        )
        .bind(price)
        .bind(discount_percent)
        .bind(now_millis())
        .bind(product_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!(
                "Product {product_id} not found"
            )));
        }
        Ok(())
    }
}
