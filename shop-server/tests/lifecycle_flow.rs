//! Order lifecycle: authorization, transitions, delivery updates,
//! price recalculation and optimistic-concurrency conflicts.

mod common;

use common::*;
use shared::dto::UpdateDeliveryDto;
use shared::models::order::OrderStatus;
use shared::models::DeliveryMethod;
use shared::util::now_millis;
use shop_server::db::repository::{OrderRepository, ProductRepository, RepoError};
use shop_server::{AppError, CartService, CartTransferEngine, OrderLifecycle, Principal};

#[tokio::test]
async fn owner_can_cancel_a_pending_order() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let lifecycle = OrderLifecycle::new(&t.db);

    let order = lifecycle
        .cancel_order(Principal::customer(1), order_id)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn stranger_cannot_touch_someone_elses_order() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let lifecycle = OrderLifecycle::new(&t.db);

    let err = lifecycle
        .cancel_order(Principal::customer(2), order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(order_status(&t.db, order_id).await, OrderStatus::PendingPayment);
}

#[tokio::test]
async fn elevated_roles_can_cancel_any_non_terminal_order() {
    let t = test_db().await;
    let lifecycle = OrderLifecycle::new(&t.db);

    for status in [OrderStatus::PendingPayment, OrderStatus::Paid, OrderStatus::InTransit] {
        let order_id = seed_order(&t.db, 1, status, now_millis()).await;
        let order = lifecycle
            .cancel_order(Principal::manager(99), order_id)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }
}

#[tokio::test]
async fn terminal_orders_cannot_be_cancelled() {
    let t = test_db().await;
    let lifecycle = OrderLifecycle::new(&t.db);

    for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
        let order_id = seed_order(&t.db, 1, status, now_millis()).await;
        let err = lifecycle
            .cancel_order(Principal::admin(99), order_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert_eq!(order_status(&t.db, order_id).await, status);
    }
}

#[tokio::test]
async fn unknown_status_string_is_an_invalid_argument() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::Paid, now_millis()).await;
    let lifecycle = OrderLifecycle::new(&t.db);

    let err = lifecycle
        .update_status(Principal::admin(99), order_id, "SHIPPED")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Invalid(_)));
}

#[tokio::test]
async fn known_but_unreachable_status_is_a_business_rule_violation() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let lifecycle = OrderLifecycle::new(&t.db);

    // PENDING_PAYMENT cannot jump straight to IN_TRANSIT
    let err = lifecycle
        .update_status(Principal::admin(99), order_id, "IN_TRANSIT")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn admin_advances_a_paid_order_manually() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::Paid, now_millis()).await;
    let lifecycle = OrderLifecycle::new(&t.db);

    let order = lifecycle
        .update_status(Principal::admin(99), order_id, "IN_TRANSIT")
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::InTransit);
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let t = test_db().await;
    let lifecycle = OrderLifecycle::new(&t.db);

    let err = lifecycle
        .cancel_order(Principal::admin(99), 123456789)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delivery_fields_update_only_while_pending() {
    let t = test_db().await;
    let lifecycle = OrderLifecycle::new(&t.db);
    let dto = UpdateDeliveryDto {
        delivery_address: "Gran Via 28, Madrid".to_string(),
        contact_phone: "+34911222333".to_string(),
        delivery_method: DeliveryMethod::Pickup,
    };

    let pending = seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    let order = lifecycle
        .update_delivery(Principal::customer(1), pending, dto.clone())
        .await
        .unwrap();
    assert_eq!(order.delivery_address, "Gran Via 28, Madrid");
    assert_eq!(order.delivery_method, DeliveryMethod::Pickup);

    let paid = seed_order(&t.db, 1, OrderStatus::Paid, now_millis()).await;
    let err = lifecycle
        .update_delivery(Principal::customer(1), paid, dto)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn customers_list_only_their_own_orders() {
    let t = test_db().await;
    seed_order(&t.db, 1, OrderStatus::PendingPayment, now_millis()).await;
    seed_order(&t.db, 1, OrderStatus::Paid, now_millis()).await;
    seed_order(&t.db, 2, OrderStatus::Paid, now_millis()).await;
    let lifecycle = OrderLifecycle::new(&t.db);

    let own = lifecycle
        .orders_for_user(Principal::customer(1), 1)
        .await
        .unwrap();
    assert_eq!(own.len(), 2);

    let err = lifecycle
        .orders_for_user(Principal::customer(1), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let other = lifecycle
        .orders_for_user(Principal::manager(99), 2)
        .await
        .unwrap();
    assert_eq!(other.len(), 1);
}

#[tokio::test]
async fn status_listing_covers_the_whole_pipeline() {
    let t = test_db().await;
    let lifecycle = OrderLifecycle::new(&t.db);

    let statuses = lifecycle.statuses();
    assert_eq!(statuses.len(), 5);
    assert_eq!(statuses[0].status, OrderStatus::PendingPayment);
    assert!(!statuses[0].label.is_empty());
}

#[tokio::test]
async fn recalculation_refreshes_snapshots_while_pending() {
    let t = test_db().await;
    let monitor = seed_product(&t.db, "Monitor", 100.0, Some(10.0)).await;
    let cart = CartService::new(&t.db);
    let engine = CartTransferEngine::new(&t.db);
    let lifecycle = OrderLifecycle::new(&t.db);

    cart.add_item(1, monitor, 1).await.unwrap();
    let detail = engine.transfer_to_order(1, delivery_details()).await.unwrap();
    assert_eq!(detail.items[0].price_at_purchase, 90.0);

    ProductRepository::new(t.db.pool.clone())
        .set_pricing(monitor, 200.0, Some(50.0))
        .await
        .unwrap();

    let refreshed = lifecycle
        .recalculate_price(Principal::customer(1), detail.order.order_id)
        .await
        .unwrap();
    assert_eq!(refreshed.items[0].price_at_purchase, 100.0);
}

#[tokio::test]
async fn recalculation_is_rejected_once_paid() {
    let t = test_db().await;
    let monitor = seed_product(&t.db, "Monitor", 100.0, Some(10.0)).await;
    let cart = CartService::new(&t.db);
    let engine = CartTransferEngine::new(&t.db);
    let lifecycle = OrderLifecycle::new(&t.db);

    cart.add_item(1, monitor, 1).await.unwrap();
    let detail = engine.transfer_to_order(1, delivery_details()).await.unwrap();
    let order_id = detail.order.order_id;

    lifecycle
        .update_status(Principal::admin(99), order_id, "PAID")
        .await
        .unwrap();
    ProductRepository::new(t.db.pool.clone())
        .set_pricing(monitor, 200.0, None)
        .await
        .unwrap();

    let err = lifecycle
        .recalculate_price(Principal::customer(1), order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // The snapshot survived both the catalog change and the attempt
    let items = order_items(&t.db, order_id).await;
    assert_eq!(items[0].price_at_purchase, 90.0);
}

#[tokio::test]
async fn stale_version_write_is_a_conflict() {
    let t = test_db().await;
    let order_id = seed_order(&t.db, 1, OrderStatus::Paid, now_millis()).await;
    let orders = OrderRepository::new(t.db.pool.clone());

    // First writer wins
    orders
        .update_status_checked(order_id, 0, OrderStatus::InTransit)
        .await
        .unwrap();

    // Second writer still holds version 0 and must lose
    let err = orders
        .update_status_checked(order_id, 0, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert_eq!(order_status(&t.db, order_id).await, OrderStatus::InTransit);
}
