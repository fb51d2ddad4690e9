mod common;

use fomo_commerce_api::{
    dto::{
        cart::AddToCartRequest,
        catalog::UpdateProductRequest,
        favorites::TrackRequest,
        orders::CheckoutRequest,
        payments::{PayOrderRequest, ProcessRefundRequest, RefundDecision, RefundRequest},
    },
    entity::{
        Coupons,
        coupons::Column as CouponCol,
        enums::{NotificationKind, OrderStatus, RefundStatus, TransactionStatus},
        products::Entity as Products,
    },
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::Pagination,
    services::{
        cart_service, notification_service, order_service, payment_service, product_service,
        refund_service, tracking_service,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use common::*;

fn shipping(coupon_code: Option<String>) -> CheckoutRequest {
    CheckoutRequest {
        shipping_address: "1 Ferris Street".into(),
        shipping_phone: "555-0100".into(),
        coupon_code,
        ..Default::default()
    }
}

async fn promotion_count(state: &AppState, user: &AuthUser) -> anyhow::Result<usize> {
    let list = notification_service::list_notifications(state, user, Pagination::new(1, 50))
        .await?
        .data
        .expect("notifications");
    Ok(list
        .items
        .iter()
        .filter(|n| n.kind == NotificationKind::Promotion)
        .count())
}

async fn fill_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    quantity: i32,
) -> anyhow::Result<()> {
    cart_service::add_to_cart(state, user, AddToCartRequest { product_id, quantity }).await?;
    Ok(())
}

async fn stock_of(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .expect("product exists");
    Ok(product.stock)
}

#[tokio::test]
async fn coupon_checkout_discounts_and_decrements_stock() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(100), 5).await?;
    let code = create_percentage_coupon(&state, 10, Decimal::from(50)).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?;

    let resp = order_service::checkout(&state, &user, shipping(Some(code))).await?;
    let checkout = resp.data.expect("checkout data");

    assert_eq!(checkout.order.status, OrderStatus::Pending);
    assert_eq!(checkout.order.subtotal_amount, Decimal::from(200));
    assert_eq!(checkout.order.discount_amount, Decimal::from(20));
    assert_eq!(checkout.order.total_amount, Decimal::from(180));
    assert!(checkout.coupon_message.is_none());
    assert_eq!(checkout.items.len(), 1);
    assert_eq!(checkout.items[0].product_name, product.name);

    assert_eq!(stock_of(&state, product.id).await?, 3);
    let cart = cart_service::list_cart(&state, &user).await?.data.expect("cart");
    assert!(cart.items.is_empty());

    let notifications = notification_service::list_notifications(&state, &user, Pagination::new(1, 20))
        .await?
        .data
        .expect("notifications");
    assert!(notifications.items.iter().any(|n| n.kind == NotificationKind::Order));

    Ok(())
}

#[tokio::test]
async fn unknown_coupon_still_checks_out_at_full_price() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::new(2550, 2), 10).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?;

    let checkout = order_service::checkout(&state, &user, shipping(Some("NO-SUCH-CODE".into())))
        .await?
        .data
        .expect("checkout data");

    assert_eq!(checkout.order.total_amount, Decimal::new(5100, 2));
    assert_eq!(checkout.order.discount_amount, Decimal::ZERO);
    assert!(checkout.order.coupon_id.is_none());
    assert_eq!(checkout.coupon_message.as_deref(), Some("Invalid coupon"));

    Ok(())
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let admin = create_admin(&state).await?;
    let plenty = create_product(&state, Decimal::from(10), 10).await?;
    let scarce = create_product(&state, Decimal::from(10), 5).await?;

    for (product_id, quantity) in [(plenty.id, 1), (scarce.id, 3)] {
        cart_service::add_to_cart(&state, &user, AddToCartRequest { product_id, quantity }).await?;
    }

    // Stock drops after the item went into the cart.
    product_service::update_product(
        &state,
        &admin,
        scarce.id,
        UpdateProductRequest {
            stock: Some(2),
            ..Default::default()
        },
    )
    .await?;

    let err = order_service::checkout(&state, &user, shipping(None))
        .await
        .unwrap_err();
    match err {
        AppError::BadRequest(message) => {
            assert_eq!(message, format!("Insufficient stock for {}", scarce.name));
        }
        other => panic!("expected bad request, got {other:?}"),
    }

    assert_eq!(stock_of(&state, plenty.id).await?, 10);
    assert_eq!(stock_of(&state, scarce.id).await?, 2);
    let cart = cart_service::list_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 2);
    let orders = order_service::list_orders(&state, &user, Default::default())
        .await?
        .data
        .expect("orders");
    assert!(orders.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn empty_cart_cannot_check_out() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;

    let err = order_service::checkout(&state, &user, shipping(None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Cart is empty"));

    Ok(())
}

#[tokio::test]
async fn pay_refund_and_approve_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let admin = create_admin(&state).await?;
    let product = create_product(&state, Decimal::from(40), 5).await?;
    let method_id = create_payment_method(&state).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 1,
        },
    )
    .await?;
    let order = order_service::checkout(&state, &user, shipping(None))
        .await?
        .data
        .expect("checkout data")
        .order;

    let paid = payment_service::pay_order(
        &state,
        &user,
        order.id,
        PayOrderRequest {
            payment_method_id: method_id,
        },
    )
    .await?
    .data
    .expect("payment data");
    assert_eq!(paid.order.status, OrderStatus::Paid);
    assert_eq!(paid.transaction.status, TransactionStatus::Completed);
    assert_eq!(paid.transaction.amount, Decimal::from(40));
    assert!(paid.transaction.completed_at.is_some());

    // Only pending orders can be paid.
    let err = payment_service::pay_order(
        &state,
        &user,
        order.id,
        PayOrderRequest {
            payment_method_id: method_id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "This order cannot be paid"));

    let refund = refund_service::request_refund(
        &state,
        &user,
        order.id,
        RefundRequest {
            reason: "Arrived damaged".into(),
        },
    )
    .await?
    .data
    .expect("refund data");
    assert_eq!(refund.status, RefundStatus::Pending);
    assert_eq!(refund.amount, Decimal::from(40));
    assert_eq!(refund.payment_transaction_id, paid.transaction.id);

    let duplicate = refund_service::request_refund(
        &state,
        &user,
        order.id,
        RefundRequest {
            reason: "Asking again".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(duplicate, AppError::BadRequest(_)));

    let decided = refund_service::process_refund(
        &state,
        &admin,
        refund.id,
        ProcessRefundRequest {
            action: RefundDecision::Approve,
        },
    )
    .await?
    .data
    .expect("decision data");
    assert_eq!(decided.refund.status, RefundStatus::Completed);
    assert!(decided.refund.completed_at.is_some());
    assert_eq!(decided.order.status, OrderStatus::Refunded);

    let transaction = payment_service::get_transaction(&state, &user, paid.transaction.id)
        .await?
        .data
        .expect("transaction");
    assert_eq!(transaction.status, TransactionStatus::Refunded);

    let again = refund_service::process_refund(
        &state,
        &admin,
        refund.id,
        ProcessRefundRequest {
            action: RefundDecision::Reject,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(again, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn unpaid_order_cannot_be_refunded() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(15), 5).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 1,
        },
    )
    .await?;
    let order = order_service::checkout(&state, &user, shipping(None))
        .await?
        .data
        .expect("checkout data")
        .order;

    let err = refund_service::request_refund(
        &state,
        &user,
        order.id,
        RefundRequest {
            reason: "Changed my mind".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "This order cannot be refunded"));

    Ok(())
}

#[tokio::test]
async fn price_change_notifies_price_trackers_only() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_admin(&state).await?;
    let price_watcher = create_user(&state).await?;
    let stock_watcher = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(100), 20).await?;

    tracking_service::track_product(&state, &price_watcher, product.id, TrackRequest::default())
        .await?;
    tracking_service::track_product(
        &state,
        &stock_watcher,
        product.id,
        TrackRequest {
            track_price: false,
            track_stock: true,
            track_status: true,
        },
    )
    .await?;

    let updated = product_service::update_product(
        &state,
        &admin,
        product.id,
        UpdateProductRequest {
            price: Some(Decimal::from(80)),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("update data");
    assert!(updated.price_changed);
    assert_eq!(updated.trackers_notified, 1);
    assert_eq!(updated.product.price, Decimal::from(80));

    assert_eq!(promotion_count(&state, &price_watcher).await?, 1);
    assert_eq!(promotion_count(&state, &stock_watcher).await?, 0);

    let history = product_service::list_price_history(&state, product.id, Pagination::new(1, 10))
        .await?
        .data
        .expect("history");
    assert_eq!(history.items.len(), 1);
    assert_eq!(history.items[0].price, Decimal::from(80));

    // Same price again: nothing to fan out.
    let unchanged = product_service::update_product(
        &state,
        &admin,
        product.id,
        UpdateProductRequest {
            price: Some(Decimal::from(80)),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("update data");
    assert!(!unchanged.price_changed);
    assert_eq!(unchanged.trackers_notified, 0);

    Ok(())
}

#[tokio::test]
async fn blank_or_oversized_shipping_details_abort_checkout() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(30), 6).await?;
    fill_cart(&state, &user, product.id, 2).await?;

    let attempts = [
        ("   ", "555-0100"),
        ("1 Ferris Street", ""),
        ("1 Ferris Street", "+1 (555) 0100-0000 ext. 1234"),
    ];
    for (address, phone) in attempts {
        let err = order_service::checkout(
            &state,
            &user,
            CheckoutRequest {
                shipping_address: address.into(),
                shipping_phone: phone.into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{address:?} / {phone:?}");
    }

    assert_eq!(stock_of(&state, product.id).await?, 6);
    let cart = cart_service::list_cart(&state, &user).await?.data.expect("cart");
    assert_eq!(cart.items.len(), 1);
    let orders = order_service::list_orders(&state, &user, Default::default())
        .await?
        .data
        .expect("orders");
    assert!(orders.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn coupon_usage_limit_is_enforced_across_checkouts() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let first = create_user(&state).await?;
    let second = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(100), 10).await?;
    let code = create_coupon_with(&state, 10, Decimal::ZERO, Some(1), None).await?;

    fill_cart(&state, &first, product.id, 1).await?;
    let used = order_service::checkout(&state, &first, shipping(Some(code.clone())))
        .await?
        .data
        .expect("checkout data");
    assert_eq!(used.order.total_amount, Decimal::from(90));
    assert!(used.order.coupon_id.is_some());

    let coupon = Coupons::find()
        .filter(CouponCol::Code.eq(code.as_str()))
        .one(&state.orm)
        .await?
        .expect("coupon");
    assert_eq!(coupon.used_count, 1);

    fill_cart(&state, &second, product.id, 1).await?;
    let exhausted = order_service::checkout(&state, &second, shipping(Some(code)))
        .await?
        .data
        .expect("checkout data");
    assert_eq!(exhausted.order.total_amount, Decimal::from(100));
    assert_eq!(exhausted.order.discount_amount, Decimal::ZERO);
    assert!(exhausted.order.coupon_id.is_none());
    assert_eq!(
        exhausted.coupon_message.as_deref(),
        Some("Coupon usage limit reached")
    );

    let coupon = Coupons::find_by_id(coupon.id)
        .one(&state.orm)
        .await?
        .expect("coupon");
    assert_eq!(coupon.used_count, 1);

    Ok(())
}

#[tokio::test]
async fn percentage_coupon_respects_max_discount_at_checkout() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(100), 10).await?;
    let code = create_coupon_with(&state, 50, Decimal::ZERO, None, Some(Decimal::from(30))).await?;

    fill_cart(&state, &user, product.id, 2).await?;
    let checkout = order_service::checkout(&state, &user, shipping(Some(code)))
        .await?
        .data
        .expect("checkout data");

    assert_eq!(checkout.order.subtotal_amount, Decimal::from(200));
    assert_eq!(checkout.order.discount_amount, Decimal::from(30));
    assert_eq!(checkout.order.total_amount, Decimal::from(170));
    assert!(checkout.coupon_message.is_none());

    Ok(())
}

#[tokio::test]
async fn rejected_refund_keeps_order_paid_and_allows_a_new_request() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let admin = create_admin(&state).await?;
    let product = create_product(&state, Decimal::from(25), 5).await?;
    let method_id = create_payment_method(&state).await?;

    fill_cart(&state, &user, product.id, 1).await?;
    let order = order_service::checkout(&state, &user, shipping(None))
        .await?
        .data
        .expect("checkout data")
        .order;
    payment_service::pay_order(
        &state,
        &user,
        order.id,
        PayOrderRequest {
            payment_method_id: method_id,
        },
    )
    .await?;

    let refund = refund_service::request_refund(
        &state,
        &user,
        order.id,
        RefundRequest {
            reason: "Wrong size".into(),
        },
    )
    .await?
    .data
    .expect("refund data");

    let decided = refund_service::process_refund(
        &state,
        &admin,
        refund.id,
        ProcessRefundRequest {
            action: RefundDecision::Reject,
        },
    )
    .await?
    .data
    .expect("decision data");
    assert_eq!(decided.refund.status, RefundStatus::Rejected);
    assert!(decided.refund.completed_at.is_none());
    assert_eq!(decided.order.status, OrderStatus::Paid);

    let notifications = notification_service::list_notifications(&state, &user, Pagination::new(1, 50))
        .await?
        .data
        .expect("notifications");
    assert!(
        notifications
            .items
            .iter()
            .any(|n| n.kind == NotificationKind::Payment && n.title == "Refund rejected")
    );

    let again = refund_service::request_refund(
        &state,
        &user,
        order.id,
        RefundRequest {
            reason: "Still the wrong size".into(),
        },
    )
    .await?
    .data
    .expect("refund data");
    assert_eq!(again.status, RefundStatus::Pending);
    assert_ne!(again.id, refund.id);

    Ok(())
}
