//! Payment Confirmation
//!
//! Drives the PENDING_PAYMENT -> PAID transition and the follow-up
//! invoice + mail notification. The status change commits first; a
//! notification failure is reported as `MailDelivery` but never rolls
//! the committed transition back. Callers must not assume a mail error
//! means the order is still awaiting payment.

use crate::auth::{self, Principal};
use crate::db::DbService;
use crate::db::repository::OrderRepository;
use crate::notify::{InvoiceRenderer, OrderMailer};
use crate::utils::{AppError, AppResult};
use shared::models::order::{OrderDetail, OrderStatus};
use shared::models::PaymentMethod;
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentService {
    orders: OrderRepository,
    renderer: Arc<dyn InvoiceRenderer>,
    mailer: Arc<dyn OrderMailer>,
}

impl PaymentService {
    pub fn new(
        db: &DbService,
        renderer: Arc<dyn InvoiceRenderer>,
        mailer: Arc<dyn OrderMailer>,
    ) -> Self {
        Self {
            orders: OrderRepository::new(db.pool.clone()),
            renderer,
            mailer,
        }
    }

    /// Confirm payment for an order awaiting it.
    ///
    /// On `Err(MailDelivery)` the PAID status has already committed.
    pub async fn confirm_payment(
        &self,
        principal: Principal,
        order_id: i64,
        method: PaymentMethod,
    ) -> AppResult<OrderDetail> {
        let order = self.orders.get(order_id).await?;
        auth::ensure_order_access(principal, order.user_id)?;
        if !order.status.can_transition_to(OrderStatus::Paid) {
            return Err(AppError::BusinessRule(format!(
                "order {order_id} cannot be paid in status {}",
                order.status
            )));
        }

        self.orders
            .update_status_checked(order_id, order.version, OrderStatus::Paid)
            .await?;
        tracing::info!(order_id, method = ?method, "Payment confirmed");

        // Point of no return: everything below is notification only.
        let detail = self.orders.detail(order_id).await?;
        self.notify(&detail, method).await?;
        Ok(detail)
    }

    async fn notify(&self, detail: &OrderDetail, method: PaymentMethod) -> AppResult<()> {
        let invoice = self
            .renderer
            .render_invoice(detail)
            .await
            .map_err(|e| mail_failure(detail.order.order_id, e))?;
        self.mailer
            .send_order_paid(detail.order.user_id, detail, method, &invoice)
            .await
            .map_err(|e| mail_failure(detail.order.order_id, e))?;
        Ok(())
    }
}

fn mail_failure(order_id: i64, e: anyhow::Error) -> AppError {
    tracing::warn!(order_id, error = %e, "Payment notification failed; order stays PAID");
    AppError::MailDelivery(format!(
        "order {order_id} is PAID but the confirmation mail failed: {e}"
    ))
}
