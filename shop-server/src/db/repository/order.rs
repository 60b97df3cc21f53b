//! Order Repository
//!
//! Persistence and queries for orders and their snapshot line items.
//! Every status/delivery write is version-checked so a lost race against
//! a concurrent writer surfaces as a conflict instead of a silent
//! overwrite.

use super::{RepoError, RepoResult};
use shared::dto::UpdateDeliveryDto;
use shared::models::order::{Order, OrderDetail, OrderItem, OrderStatus};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn find_by_id(&self, order_id: i64) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT order_id, user_id, status, delivery_address, contact_phone,
                    delivery_method, version, created_at, updated_at
             FROM orders WHERE order_id = ?",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    /// Fetch an order or fail with NotFound
    pub async fn get(&self, order_id: i64) -> RepoResult<Order> {
        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
    }

    pub async fn items(&self, order_id: i64) -> RepoResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT order_item_id, order_id, product_id, quantity, price_at_purchase
             FROM order_items WHERE order_id = ? ORDER BY order_item_id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn detail(&self, order_id: i64) -> RepoResult<OrderDetail> {
        let order = self.get(order_id).await?;
        let items = self.items(order_id).await?;
        Ok(OrderDetail { order, items })
    }

    /// A user's orders, newest first
    pub async fn find_by_user(&self, user_id: i64) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT order_id, user_id, status, delivery_address, contact_phone,
                    delivery_method, version, created_at, updated_at
             FROM orders WHERE user_id = ? ORDER BY created_at DESC, order_id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    /// One scheduler page: orders sitting in a delivery-pipeline status
    /// long enough to advance. Keyset pagination on order_id, since advancing
    /// IN_TRANSIT rows to DELIVERED removes them from this filter, which
    /// would make OFFSET pages skip rows.
    pub async fn delivery_page(
        &self,
        after_order_id: i64,
        max_updated_at: i64,
        limit: u32,
    ) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT order_id, user_id, status, delivery_address, contact_phone,
                    delivery_method, version, created_at, updated_at
             FROM orders
             WHERE status IN (?, ?) AND updated_at <= ? AND order_id > ?
             ORDER BY order_id
             LIMIT ?",
        )
        .bind(OrderStatus::Paid)
        .bind(OrderStatus::InTransit)
        .bind(max_updated_at)
        .bind(after_order_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Version-checked status write. Loses to a concurrent writer with
    /// `Conflict`; a vanished row is `NotFound`.
    pub async fn update_status_checked(
        &self,
        order_id: i64,
        expected_version: i64,
        next: OrderStatus,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, version = version + 1, updated_at = ?
             WHERE order_id = ? AND version = ?",
        )
        .bind(next)
        .bind(now_millis())
        .bind(order_id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        self.classify_checked_write(result.rows_affected(), order_id)
            .await
    }

    /// Version-checked delivery-field write
    pub async fn update_delivery_checked(
        &self,
        order_id: i64,
        expected_version: i64,
        dto: &UpdateDeliveryDto,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE orders
             SET delivery_address = ?, contact_phone = ?, delivery_method = ?,
                 version = version + 1, updated_at = ?
             WHERE order_id = ? AND version = ?",
        )
        .bind(&dto.delivery_address)
        .bind(&dto.contact_phone)
        .bind(dto.delivery_method)
        .bind(now_millis())
        .bind(order_id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        self.classify_checked_write(result.rows_affected(), order_id)
            .await
    }

    async fn classify_checked_write(&self, rows_affected: u64, order_id: i64) -> RepoResult<()> {
        if rows_affected == 1 {
            return Ok(());
        }
        match self.find_by_id(order_id).await? {
            Some(_) => Err(RepoError::Conflict(format!(
                "Order {order_id} was modified concurrently"
            ))),
            None => Err(RepoError::NotFound(format!("Order {order_id} not found"))),
        }
    }

    // ========================================================================
    // Transactional variants (transfer, recalculation, scheduler pages)
    // ========================================================================

    pub async fn insert_order_tx(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO orders (order_id, user_id, status, delivery_address, contact_phone,
                                 delivery_method, version, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.order_id)
        .bind(order.user_id)
        .bind(order.status)
        .bind(&order.delivery_address)
        .bind(&order.contact_phone)
        .bind(order.delivery_method)
        .bind(order.version)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn insert_item_tx(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO order_items (order_item_id, order_id, product_id, quantity,
                                      price_at_purchase)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(item.order_item_id)
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price_at_purchase)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Overwrite one line's snapshot price (price recalculation, only ever
    /// invoked while the order is still PENDING_PAYMENT)
    pub async fn update_item_price_tx(
        conn: &mut SqliteConnection,
        order_item_id: i64,
        price_at_purchase: f64,
    ) -> RepoResult<()> {
        sqlx::query("UPDATE order_items SET price_at_purchase = ? WHERE order_item_id = ?")
            .bind(price_at_purchase)
            .bind(order_item_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Version-checked bump inside a transaction; false means the row was
    /// modified concurrently and the caller should treat it as a conflict.
    pub async fn bump_version_tx(
        conn: &mut SqliteConnection,
        order_id: i64,
        expected_version: i64,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE orders SET version = version + 1, updated_at = ?
             WHERE order_id = ? AND version = ?",
        )
        .bind(now_millis())
        .bind(order_id)
        .bind(expected_version)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Version-checked status advance inside a scheduler page transaction.
    /// Returns false when the row lost a race (user cancelled, another
    /// writer advanced it); the caller skips that row.
    pub async fn advance_status_tx(
        conn: &mut SqliteConnection,
        order_id: i64,
        expected_version: i64,
        next: OrderStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, version = version + 1, updated_at = ?
             WHERE order_id = ? AND version = ?",
        )
        .bind(next)
        .bind(now_millis())
        .bind(order_id)
        .bind(expected_version)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
