//! Notification Collaborators
//!
//! Invoice rendering and mail delivery are external systems; the payment
//! flow only sees these seams. Failures here never roll back an already
//! committed status change; they surface as `AppError::MailDelivery`.

use async_trait::async_trait;
use shared::models::order::OrderDetail;
use shared::models::PaymentMethod;

/// Renders the invoice document attached to the payment confirmation mail
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render_invoice(&self, order: &OrderDetail) -> anyhow::Result<Vec<u8>>;
}

/// Delivers order notification mail to the shop's mail infrastructure
#[async_trait]
pub trait OrderMailer: Send + Sync {
    async fn send_order_paid(
        &self,
        user_id: i64,
        order: &OrderDetail,
        method: PaymentMethod,
        invoice: &[u8],
    ) -> anyhow::Result<()>;
}
