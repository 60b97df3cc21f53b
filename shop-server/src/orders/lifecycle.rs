//! Order Lifecycle
//!
//! The state machine over persisted orders. Every operation takes the
//! acting principal explicitly and checks the owner-or-elevated policy
//! before touching the row; every status write is version-checked so a
//! concurrent writer (another request, the scheduler) loses with a
//! `Conflict` instead of silently overwriting.

use crate::auth::{self, Principal};
use crate::db::DbService;
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::pricing;
use crate::utils::{AppError, AppResult};
use shared::dto::{OrderStatusDto, UpdateDeliveryDto};
use shared::models::order::{Order, OrderDetail, OrderStatus};
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Clone)]
pub struct OrderLifecycle {
    pool: SqlitePool,
    orders: OrderRepository,
    products: ProductRepository,
}

impl OrderLifecycle {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
            orders: OrderRepository::new(db.pool.clone()),
            products: ProductRepository::new(db.pool.clone()),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Order with items; readable by its owner and elevated roles
    pub async fn order_detail(&self, principal: Principal, order_id: i64) -> AppResult<OrderDetail> {
        let order = self.load(order_id).await?;
        auth::ensure_order_access(principal, order.user_id)?;
        let items = self.orders.items(order_id).await?;
        Ok(OrderDetail { order, items })
    }

    /// A user's orders, newest first. Customers see only their own.
    pub async fn orders_for_user(&self, principal: Principal, user_id: i64) -> AppResult<Vec<Order>> {
        if principal.user_id != user_id && !principal.role.is_elevated() {
            return Err(AppError::Forbidden(format!(
                "user {} may not list orders of user {user_id}",
                principal.user_id
            )));
        }
        Ok(self.orders.find_by_user(user_id).await?)
    }

    /// All order statuses with display labels (admin tooling)
    pub fn statuses(&self) -> Vec<OrderStatusDto> {
        OrderStatus::all().into_iter().map(Into::into).collect()
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Cancel: allowed from any non-terminal state
    pub async fn cancel_order(&self, principal: Principal, order_id: i64) -> AppResult<Order> {
        self.transition(principal, order_id, OrderStatus::Cancelled)
            .await
    }

    /// Explicit status change with a caller-supplied status string.
    /// Unknown strings are invalid arguments; known-but-unreachable
    /// targets are business-rule violations.
    pub async fn update_status(
        &self,
        principal: Principal,
        order_id: i64,
        status: &str,
    ) -> AppResult<Order> {
        let next: OrderStatus = status.parse()?;
        self.transition(principal, order_id, next).await
    }

    async fn transition(
        &self,
        principal: Principal,
        order_id: i64,
        next: OrderStatus,
    ) -> AppResult<Order> {
        let order = self.load(order_id).await?;
        auth::ensure_order_access(principal, order.user_id)?;
        if !order.status.can_transition_to(next) {
            return Err(AppError::BusinessRule(format!(
                "order {order_id} cannot move from {} to {next}",
                order.status
            )));
        }
        self.orders
            .update_status_checked(order_id, order.version, next)
            .await?;
        tracing::info!(order_id, from = %order.status, to = %next, "Order status changed");
        Ok(self.orders.get(order_id).await?)
    }

    // ========================================================================
    // Delivery fields
    // ========================================================================

    /// Delivery address/phone/method may change only while the order is
    /// still awaiting payment.
    pub async fn update_delivery(
        &self,
        principal: Principal,
        order_id: i64,
        dto: UpdateDeliveryDto,
    ) -> AppResult<Order> {
        dto.validate()?;
        let order = self.load(order_id).await?;
        auth::ensure_order_access(principal, order.user_id)?;
        if order.status != OrderStatus::PendingPayment {
            return Err(AppError::BusinessRule(format!(
                "delivery details of order {order_id} are frozen in status {}",
                order.status
            )));
        }
        self.orders
            .update_delivery_checked(order_id, order.version, &dto)
            .await?;
        Ok(self.orders.get(order_id).await?)
    }

    // ========================================================================
    // Price recalculation
    // ========================================================================

    /// Re-derive every line's `price_at_purchase` from the live catalog.
    /// Only meaningful while PENDING_PAYMENT; once paid, snapshots are
    /// frozen and this is rejected.
    pub async fn recalculate_price(
        &self,
        principal: Principal,
        order_id: i64,
    ) -> AppResult<OrderDetail> {
        let order = self.load(order_id).await?;
        auth::ensure_order_access(principal, order.user_id)?;
        if order.status != OrderStatus::PendingPayment {
            return Err(AppError::BusinessRule(format!(
                "prices of order {order_id} are frozen in status {}",
                order.status
            )));
        }

        let items = self.orders.items(order_id).await?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for item in &items {
            let product = self.products.get(item.product_id).await.map_err(|_| {
                AppError::BusinessRule(format!(
                    "product {} of order {order_id} is gone from the catalog",
                    item.product_id
                ))
            })?;
            let price = pricing::discounted_unit_price(
                product.price,
                product.discount_percent.unwrap_or(0.0),
            )?;
            OrderRepository::update_item_price_tx(&mut *tx, item.order_item_id, price).await?;
        }
        if !OrderRepository::bump_version_tx(&mut *tx, order_id, order.version).await? {
            return Err(AppError::Conflict(format!(
                "Order {order_id} was modified concurrently"
            )));
        }
        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(order_id, items = items.len(), "Order prices recalculated");
        Ok(self.orders.detail(order_id).await?)
    }

    async fn load(&self, order_id: i64) -> AppResult<Order> {
        Ok(self.orders.get(order_id).await?)
    }
}
