//! Payment confirmation: authorization, the committed-then-notify
//! ordering, and the mail-failure asymmetry.

mod common;

use async_trait::async_trait;
use common::*;
use shared::models::order::{OrderDetail, OrderStatus};
use shared::models::PaymentMethod;
use shared::util::now_millis;
use shop_server::notify::{InvoiceRenderer, OrderMailer};
use shop_server::{AppError, PaymentService, Principal};
use std::sync::{Arc, Mutex};

struct StubRenderer;

#[async_trait]
impl InvoiceRenderer for StubRenderer {
    async fn render_invoice(&self, _order: &OrderDetail) -> anyhow::Result<Vec<u8>> {
        Ok(b"%PDF-1.7 stub invoice".to_vec())
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(i64, usize)>>,
    fail: bool,
}

#[async_trait]
impl OrderMailer for RecordingMailer {
    async fn send_order_paid(
        &self,
        _user_id: i64,
        order: &OrderDetail,
        _method: PaymentMethod,
        invoice: &[u8],
    ) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("smtp connection refused");
        }
        self.sent
            .lock()
            .unwrap()
            .push((order.order.order_id, invoice.len()));
        Ok(())
    }
}

fn payment_service(t: &TestDb, mailer: Arc<RecordingMailer>) -> PaymentService {
    PaymentService::new(&t.db, Arc::new(StubRenderer), mailer)
}

#[tokio::test]
async fn owner_confirms_payment_and_mail_goes_out() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let mailer = Arc::new(RecordingMailer::default());
    let payments = payment_service(&t, mailer.clone());

    let detail = payments
        .confirm_payment(Principal::customer(1), order_id, PaymentMethod::Card)
        .await
        .unwrap();

    assert_eq!(detail.order.status, OrderStatus::Paid);
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, order_id);
    assert!(sent[0].1 > 0, "invoice bytes must reach the mailer");
}

#[tokio::test]
async fn stranger_cannot_confirm_someone_elses_payment() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let mailer = Arc::new(RecordingMailer::default());
    let payments = payment_service(&t, mailer.clone());

    let err = payments
        .confirm_payment(Principal::customer(2), order_id, PaymentMethod::Card)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(order_status(&t.db, order_id).await, OrderStatus::PendingPayment);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn admin_confirms_regardless_of_owner() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let payments = payment_service(&t, Arc::new(RecordingMailer::default()));

    let detail = payments
        .confirm_payment(Principal::admin(99), order_id, PaymentMethod::BankTransfer)
        .await
        .unwrap();
    assert_eq!(detail.order.status, OrderStatus::Paid);
}

#[tokio::test]
async fn mail_failure_reports_but_keeps_the_order_paid() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let payments = payment_service(&t, mailer);

    let err = payments
        .confirm_payment(Principal::customer(1), order_id, PaymentMethod::Card)
        .await
        .unwrap_err();

    // The error names the mail failure, but the PAID transition already
    // committed and must not be rolled back.
    assert!(matches!(err, AppError::MailDelivery(_)));
    assert_eq!(order_status(&t.db, order_id).await, OrderStatus::Paid);
}

#[tokio::test]
async fn paying_twice_is_a_business_rule_violation() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let payments = payment_service(&t, Arc::new(RecordingMailer::default()));

    payments
        .confirm_payment(Principal::customer(1), order_id, PaymentMethod::Card)
        .await
        .unwrap();
    let err = payments
        .confirm_payment(Principal::customer(1), order_id, PaymentMethod::Card)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn paying_a_missing_order_is_not_found() {
    let t = test_db().await;
    let payments = payment_service(&t, Arc::new(RecordingMailer::default()));

    let err = payments
        .confirm_payment(Principal::customer(1), 987654321, PaymentMethod::Card)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
