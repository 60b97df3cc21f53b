//! Cart Repository
//!
//! Line-item storage for the per-user open cart. Quantities live here;
//! prices never do. Cart pricing is always read live from the catalog.

use super::RepoResult;
use shared::models::cart::{Cart, CartItem};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

/// Cart line joined with its product's live pricing fields
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLineRow {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub discount_percent: Option<f64>,
}

#[derive(Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT cart_id, user_id, created_at, updated_at FROM carts WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cart)
    }

    /// Fetch the user's open cart, creating it lazily on first access
    pub async fn find_or_create(&self, user_id: i64) -> RepoResult<Cart> {
        if let Some(cart) = self.find_by_user(user_id).await? {
            return Ok(cart);
        }
        let now = now_millis();
        // INSERT OR IGNORE guards against a concurrent first access; the
        // follow-up SELECT returns whichever row won.
        sqlx::query(
            "INSERT OR IGNORE INTO carts (cart_id, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        let cart = self.find_by_user(user_id).await?;
        cart.ok_or_else(|| {
            super::RepoError::Database(format!("cart row for user {user_id} vanished after insert"))
        })
    }

    pub async fn find_item(&self, cart_id: i64, product_id: i64) -> RepoResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            "SELECT cart_item_id, cart_id, product_id, quantity
             FROM cart_items WHERE cart_id = ? AND product_id = ?",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    /// Insert a line or add to an existing line's quantity, atomically
    pub async fn add_or_increment(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO cart_items (cart_item_id, cart_id, product_id, quantity)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = quantity + excluded.quantity",
        )
        .bind(snowflake_id())
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;
        self.touch(cart_id).await
    }

    /// Replace a line's quantity; returns false if the line is absent
    pub async fn set_quantity(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = ? WHERE cart_id = ? AND product_id = ?",
        )
        .bind(quantity)
        .bind(cart_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        self.touch(cart_id).await?;
        Ok(true)
    }

    /// Remove a line; returns false if the line is absent
    pub async fn delete_item(&self, cart_id: i64, product_id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = ? AND product_id = ?")
            .bind(cart_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        self.touch(cart_id).await?;
        Ok(true)
    }

    /// Cart lines joined with live catalog pricing, in insertion order
    pub async fn lines_with_products(&self, cart_id: i64) -> RepoResult<Vec<CartLineRow>> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.product_id, p.name, ci.quantity, p.price, p.discount_percent
             FROM cart_items ci
             JOIN products p ON p.product_id = ci.product_id
             WHERE ci.cart_id = ?
             ORDER BY ci.cart_item_id",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Empty the cart; idempotent
    pub async fn clear(&self, cart_id: i64) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = ?")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        self.touch(cart_id).await?;
        Ok(result.rows_affected())
    }

    async fn touch(&self, cart_id: i64) -> RepoResult<()> {
        sqlx::query("UPDATE carts SET updated_at = ? WHERE cart_id = ?")
            .bind(now_millis())
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Transactional variants (cart transfer)
    // ========================================================================

    /// Cart lines with live pricing, read inside an open transaction
    pub async fn lines_with_products_tx(
        conn: &mut SqliteConnection,
        cart_id: i64,
    ) -> RepoResult<Vec<CartLineRow>> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.product_id, p.name, ci.quantity, p.price, p.discount_percent
             FROM cart_items ci
             JOIN products p ON p.product_id = ci.product_id
             WHERE ci.cart_id = ?
             ORDER BY ci.cart_item_id",
        )
        .bind(cart_id)
        .fetch_all(conn)
        .await?;
        Ok(rows)
    }

    /// Empty the cart inside an open transaction
    pub async fn clear_tx(conn: &mut SqliteConnection, cart_id: i64) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = ?")
            .bind(cart_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("UPDATE carts SET updated_at = ? WHERE cart_id = ?")
            .bind(now_millis())
            .bind(cart_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
