//! Cart Transfer Engine
//!
//! Converts a non-empty cart into a new PENDING_PAYMENT order, fixing
//! each line's `price_at_purchase` from the catalog at that instant.
//! Order creation and cart clearing commit in one transaction: either
//! both apply or neither does, so a double submit sees an empty cart
//! and fails instead of creating a duplicate order.

use crate::db::DbService;
use crate::db::repository::cart::CartLineRow;
use crate::db::repository::{CartRepository, OrderRepository};
use crate::pricing;
use crate::utils::{AppError, AppResult};
use shared::dto::DeliveryDetails;
use shared::models::order::{Order, OrderDetail, OrderItem, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Clone)]
pub struct CartTransferEngine {
    pool: SqlitePool,
    carts: CartRepository,
}

impl CartTransferEngine {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
            carts: CartRepository::new(db.pool.clone()),
        }
    }

    /// Transfer the user's cart into a new order.
    ///
    /// Delivery details are an explicit argument; nothing is inferred
    /// from profile state.
    pub async fn transfer_to_order(
        &self,
        user_id: i64,
        delivery: DeliveryDetails,
    ) -> AppResult<OrderDetail> {
        delivery.validate()?;

        // Carts are created lazily and never deleted, so a missing row
        // simply means the user has never put anything in a cart.
        let Some(cart) = self.carts.find_by_user(user_id).await? else {
            return Err(empty_cart());
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let lines = CartRepository::lines_with_products_tx(&mut *tx, cart.cart_id).await?;
        if lines.is_empty() {
            return Err(empty_cart());
        }

        let now = now_millis();
        let order = Order {
            order_id: snowflake_id(),
            user_id,
            status: OrderStatus::PendingPayment,
            delivery_address: delivery.delivery_address,
            contact_phone: delivery.contact_phone,
            delivery_method: delivery.delivery_method,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        OrderRepository::insert_order_tx(&mut *tx, &order).await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = OrderItem {
                order_item_id: snowflake_id(),
                order_id: order.order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                price_at_purchase: snapshot_price(line)?,
            };
            OrderRepository::insert_item_tx(&mut *tx, &item).await?;
            items.push(item);
        }

        CartRepository::clear_tx(&mut *tx, cart.cart_id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            order_id = order.order_id,
            user_id,
            items = items.len(),
            "Cart transferred to order"
        );
        Ok(OrderDetail { order, items })
    }
}

/// Snapshot one line's net unit price from its live catalog fields.
/// Unusable catalog data (negative price, discount out of range) is a
/// data-integrity failure, not a caller mistake.
fn snapshot_price(line: &CartLineRow) -> AppResult<f64> {
    pricing::discounted_unit_price(line.price, line.discount_percent.unwrap_or(0.0)).map_err(|e| {
        AppError::BusinessRule(format!(
            "product {} has no usable price snapshot input: {e}",
            line.product_id
        ))
    })
}

fn empty_cart() -> AppError {
    AppError::BusinessRule("cart is empty".to_string())
}
