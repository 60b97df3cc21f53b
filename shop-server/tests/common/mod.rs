//! Shared test fixtures: tempfile-backed SQLite database plus seed helpers.

#![allow(dead_code)]

use shared::dto::DeliveryDetails;
use shared::models::order::{OrderStatus, OrderItem};
use shared::models::product::ProductCreate;
use shared::models::DeliveryMethod;
use shop_server::core::Config;
use shop_server::db::DbService;
use shop_server::db::repository::ProductRepository;
use tempfile::TempDir;

pub struct TestDb {
    pub db: DbService,
    _dir: TempDir,
}

/// Fresh migrated database in a temp directory (dropped with the fixture)
pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("shop.db");
    let db = DbService::new(path.to_str().expect("utf-8 temp path"))
        .await
        .expect("open test database");
    TestDb { db, _dir: dir }
}

pub async fn seed_product(
    db: &DbService,
    name: &str,
    price: f64,
    discount_percent: Option<f64>,
) -> i64 {
    ProductRepository::new(db.pool.clone())
        .create(ProductCreate {
            name: name.to_string(),
            price,
            discount_percent,
        })
        .await
        .expect("seed product")
        .product_id
}

/// Insert an order row directly, bypassing the transfer engine; the
/// scheduler and lifecycle tests need orders in arbitrary stages and ages.
/// Ids come from a plain counter so keyset-pagination order is stable.
pub async fn seed_order(db: &DbService, user_id: i64, status: OrderStatus, updated_at: i64) -> i64 {
    use std::sync::atomic::{AtomicI64, Ordering};
    static NEXT_ORDER_ID: AtomicI64 = AtomicI64::new(1);
    let order_id = NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed);
    sqlx::query(
        "INSERT INTO orders (order_id, user_id, status, delivery_address, contact_phone,
                             delivery_method, version, created_at, updated_at)
         VALUES (?, ?, ?, 'Calle Mayor 1, Madrid', '+34600111222', 'COURIER', 0, ?, ?)",
    )
    .bind(order_id)
    .bind(user_id)
    .bind(status)
    .bind(updated_at)
    .bind(updated_at)
    .execute(&db.pool)
    .await
    .expect("seed order");
    order_id
}

pub async fn order_status(db: &DbService, order_id: i64) -> OrderStatus {
    let (status,): (OrderStatus,) = sqlx::query_as("SELECT status FROM orders WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(&db.pool)
        .await
        .expect("order status query");
    status
}

pub async fn order_items(db: &DbService, order_id: i64) -> Vec<OrderItem> {
    sqlx::query_as::<_, OrderItem>(
        "SELECT order_item_id, order_id, product_id, quantity, price_at_purchase
         FROM order_items WHERE order_id = ? ORDER BY order_item_id",
    )
    .bind(order_id)
    .fetch_all(&db.pool)
    .await
    .expect("order items query")
}

/// Push an order's updated_at into the past so the scheduler sees it as aged
pub async fn backdate_order(db: &DbService, order_id: i64, updated_at: i64) {
    sqlx::query("UPDATE orders SET updated_at = ? WHERE order_id = ?")
        .bind(updated_at)
        .bind(order_id)
        .execute(&db.pool)
        .await
        .expect("backdate order");
}

pub fn delivery_details() -> DeliveryDetails {
    DeliveryDetails {
        delivery_address: "Calle Mayor 1, Madrid".to_string(),
        contact_phone: "+34600111222".to_string(),
        delivery_method: DeliveryMethod::Courier,
    }
}

/// Config for scheduler tests; interval is irrelevant when calling tick()
pub fn scheduler_config(page_size: u32, min_stage_age_secs: u64) -> Config {
    Config {
        work_dir: ".".to_string(),
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        scheduler_interval_secs: 1,
        scheduler_page_size: page_size,
        min_stage_age_secs,
    }
}
