mod common;

use chrono::{Duration, Utc};
use fomo_commerce_api::{
    dto::{
        admin::{CreateCouponRequest, UpdateOrderStatusRequest},
        cart::AddToCartRequest,
        catalog::{CreateCategoryRequest, CreateProductRequest, UpdateProductRequest},
        orders::CheckoutRequest,
        support::FaqRequest,
    },
    entity::{
        SystemLogs,
        enums::{DiscountType, FaqCategory, LogAction, NotificationKind, OrderStatus},
        system_logs::Column as LogCol,
    },
    error::AppError,
    routes::params::{FaqQuery, LowStockQuery, Pagination},
    services::{
        admin_service, cart_service, coupon_service, faq_service, notification_service,
        order_service, product_service,
    },
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::*;

fn coupon_request(code: &str) -> CreateCouponRequest {
    let now = Utc::now();
    CreateCouponRequest {
        code: code.to_string(),
        description: "Launch week".into(),
        discount_type: DiscountType::Percentage,
        discount_value: Decimal::from(15),
        min_purchase: Decimal::from(20),
        max_discount: Some(Decimal::from(50)),
        valid_from: now,
        valid_until: now + Duration::days(7),
        usage_limit: Some(100),
    }
}

#[tokio::test]
async fn coupon_creation_validates_and_is_audited() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_admin(&state).await?;
    let code = unique("LAUNCH").to_uppercase()[..20].to_string();

    let mut over = coupon_request(&code);
    over.discount_value = Decimal::from(150);
    let err = coupon_service::create_coupon(&state, &admin, over)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let mut backwards = coupon_request(&code);
    backwards.valid_until = backwards.valid_from - Duration::days(1);
    let err = coupon_service::create_coupon(&state, &admin, backwards)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let coupon = coupon_service::create_coupon(&state, &admin, coupon_request(&code))
        .await?
        .data
        .expect("coupon");
    assert_eq!(coupon.code, code);
    assert_eq!(coupon.used_count, 0);

    let duplicate = coupon_service::create_coupon(&state, &admin, coupon_request(&code))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::BadRequest(_)));

    let logs = SystemLogs::find()
        .filter(LogCol::ObjectId.eq(coupon.id.to_string()))
        .all(&state.orm)
        .await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, LogAction::Create);
    assert_eq!(logs[0].user_id, Some(admin.user_id()));
    assert_eq!(logs[0].ip_address.as_deref(), Some("127.0.0.1"));

    Ok(())
}

#[tokio::test]
async fn non_admins_are_turned_away() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;

    let err = admin_service::dashboard(&state, &user).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = coupon_service::list_coupons(&state, &user, Pagination::new(1, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn status_change_notifies_buyer_and_dashboard_counts() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_admin(&state).await?;
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(9), 4).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 1,
        },
    )
    .await?;
    let order = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            shipping_address: "3 Shell Road".into(),
            shipping_phone: "555-0102".into(),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("checkout")
    .order;

    let stats = admin_service::dashboard(&state, &admin.user)
        .await?
        .data
        .expect("stats");
    assert!(stats.total_orders >= 1);
    assert!(stats.pending_orders >= 1);
    assert!(stats.low_stock_products >= 1);

    let shipped = admin_service::update_order_status(
        &state,
        &admin,
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Shipped,
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let notifications =
        notification_service::list_notifications(&state, &user, Pagination::new(1, 20))
            .await?
            .data
            .expect("notifications");
    assert!(
        notifications
            .items
            .iter()
            .any(|n| n.kind == NotificationKind::Order && n.title == "Order status updated")
    );

    let low = product_service::list_low_stock(
        &state,
        &admin.user,
        LowStockQuery {
            threshold: Some(5),
            per_page: Some(100),
            ..Default::default()
        },
    )
    .await?;
    assert!(low.data.expect("low stock").items.iter().any(|p| p.id == product.id));

    Ok(())
}

#[tokio::test]
async fn inactive_faqs_are_hidden_from_customers() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_admin(&state).await?;
    let question = unique("How long does shipping take");

    let faq = faq_service::create_faq(
        &state,
        &admin,
        FaqRequest {
            category: FaqCategory::Other,
            question: question.clone(),
            answer: "Two to five days.".into(),
            sort_order: 0,
            is_active: false,
        },
    )
    .await?
    .data
    .expect("faq");

    let query = || FaqQuery {
        category: Some(FaqCategory::Other),
        per_page: Some(100),
        ..Default::default()
    };
    let public = faq_service::list_faqs(&state, query()).await?.data.expect("faqs");
    assert!(!public.items.iter().any(|f| f.id == faq.id));

    let all = faq_service::list_faqs_admin(&state, &admin.user, query())
        .await?
        .data
        .expect("faqs");
    assert!(all.items.iter().any(|f| f.id == faq.id));

    let deleted = faq_service::delete_faq(&state, &admin, faq.id)
        .await?
        .data
        .expect("deleted");
    assert_eq!(deleted.id, faq.id);

    Ok(())
}

#[tokio::test]
async fn overlong_names_are_rejected_as_bad_requests() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_admin(&state).await?;

    let err = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            name: "n".repeat(201),
            description: String::new(),
            category_id: None,
            price: Decimal::from(5),
            stock: 1,
            status: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Product name must be at most 200 characters"));

    let product = create_product(&state, Decimal::from(5), 1).await?;
    let err = product_service::update_product(
        &state,
        &admin,
        product.id,
        UpdateProductRequest {
            name: Some("n".repeat(201)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = product_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "c".repeat(101),
            description: String::new(),
            parent_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = faq_service::create_faq(
        &state,
        &admin,
        FaqRequest {
            category: FaqCategory::Other,
            question: "q".repeat(201),
            answer: "Answer".into(),
            sort_order: 0,
            is_active: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Question must be at most 200 characters"));

    let err = coupon_service::create_coupon(&state, &admin, coupon_request(&"C".repeat(51)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Coupon code must be at most 50 characters"));

    Ok(())
}
