use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutPreview, CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
    entity::{
        CartItems, Coupons, OrderItems, Orders, Products,
        cart_items::Column as CartCol,
        coupons::{Column as CouponCol, Model as CouponModel},
        enums::{NotificationKind, OrderStatus},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Model as OrderModel},
        products::{Column as ProdCol, Model as ProductModel},
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    pricing::{self, CouponRejection},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_service::load_cart, notification_service::notify, profile_service},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await?;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderList { items: orders },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(id))
                .add(OrderCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = load_items(&state.orm, order.id).await?;
    Ok(ApiResponse::item(
        "OK",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
    ))
}

pub(crate) async fn load_items<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<Vec<OrderItem>, DbErr> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .all(conn)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    Ok(items)
}

/// Finds the order by id and locks its row for the rest of the transaction.
/// When `owner` is given the order must belong to that user.
pub(crate) async fn lock_order(
    txn: &DatabaseTransaction,
    id: Uuid,
    owner: Option<Uuid>,
) -> AppResult<OrderModel> {
    let mut condition = Condition::all().add(OrderCol::Id.eq(id));
    if let Some(user_id) = owner {
        condition = condition.add(OrderCol::UserId.eq(user_id));
    }
    let order = Orders::find()
        .filter(condition)
        .lock(LockType::Update)
        .one(txn)
        .await?;
    match order {
        Some(o) => Ok(o),
        None => Err(AppError::NotFound),
    }
}

struct CouponOutcome {
    coupon_id: Option<Uuid>,
    discount: Decimal,
    message: Option<String>,
}

async fn apply_coupon(
    txn: &DatabaseTransaction,
    code: &str,
    subtotal: Decimal,
) -> Result<CouponOutcome, DbErr> {
    let coupon: Option<CouponModel> = Coupons::find()
        .filter(CouponCol::Code.eq(code))
        .lock(LockType::Update)
        .one(txn)
        .await?;

    let now = Utc::now();
    let result = match coupon {
        Some(coupon) if pricing::coupon_is_live(&coupon, now) => {
            pricing::coupon_discount(&coupon, subtotal).map(|discount| (coupon, discount))
        }
        _ => Err(CouponRejection::NotFound),
    };

    match result {
        Ok((coupon, discount)) => {
            Coupons::update_many()
                .col_expr(CouponCol::UsedCount, Expr::col(CouponCol::UsedCount).add(1))
                .filter(CouponCol::Id.eq(coupon.id))
                .exec(txn)
                .await?;
            Ok(CouponOutcome {
                coupon_id: Some(coupon.id),
                discount,
                message: None,
            })
        }
        Err(rejection) => {
            tracing::debug!(code, reason = ?rejection, "coupon not applied");
            Ok(CouponOutcome {
                coupon_id: None,
                discount: Decimal::ZERO,
                message: Some(rejection.message()),
            })
        }
    }
}

/// The cart and the shipping details saved on the caller's profile, used to
/// fill in the checkout form.
pub async fn checkout_preview(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CheckoutPreview>> {
    let cart = load_cart(state, user).await?;
    if cart.items.is_empty() {
        return Err(AppError::bad_request("Cart is empty"));
    }
    let profile = profile_service::find_or_create(&state.orm, user.user_id).await?;

    Ok(ApiResponse::item(
        "OK",
        CheckoutPreview {
            items: cart.items,
            total: cart.total,
            shipping_address: profile.address,
            shipping_phone: profile.phone,
        },
    ))
}

/// Converts the caller's cart into a pending order.
///
/// Runs in one transaction with every product in the cart locked. Any stock
/// shortfall aborts before anything is written. A rejected coupon does not
/// fail the checkout; the reason is returned in `coupon_message`.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let shipping_address = payload.shipping_address.trim();
    let shipping_phone = payload.shipping_phone.trim();
    if shipping_address.is_empty() || shipping_phone.is_empty() {
        return Err(AppError::bad_request(
            "Shipping address and phone are required",
        ));
    }
    ensure_max_len("Shipping phone", shipping_phone, 20)?;

    let txn = state.orm.begin().await?;

    let lines = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .all(&txn)
        .await?;
    if lines.is_empty() {
        return Err(AppError::bad_request("Cart is empty"));
    }

    let product_ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
    let products: HashMap<Uuid, ProductModel> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .order_by_asc(ProdCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let mut subtotal = Decimal::ZERO;
    let mut priced = Vec::with_capacity(lines.len());
    for line in &lines {
        let product = match products.get(&line.product_id) {
            Some(p) => p,
            None => return Err(AppError::NotFound),
        };
        if line.quantity > product.stock {
            return Err(AppError::bad_request(format!(
                "Insufficient stock for {}",
                product.name
            )));
        }
        let line_total = pricing::line_subtotal(product.price, line.quantity);
        subtotal += line_total;
        priced.push((product, line.quantity, line_total));
    }

    let coupon = match payload
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        Some(code) => apply_coupon(&txn, code, subtotal).await?,
        None => CouponOutcome {
            coupon_id: None,
            discount: Decimal::ZERO,
            message: None,
        },
    };

    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(pricing::order_number(now)),
        user_id: Set(user.user_id),
        status: Set(OrderStatus::Pending),
        subtotal_amount: Set(subtotal),
        discount_amount: Set(coupon.discount),
        total_amount: Set(subtotal - coupon.discount),
        coupon_id: Set(coupon.coupon_id),
        shipping_address: Set(shipping_address.to_string()),
        shipping_phone: Set(shipping_phone.to_string()),
        notes: Set(payload.notes.trim().to_string()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(priced.len());
    for (product, quantity, line_total) in priced {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(Some(product.id)),
            product_name: Set(product.name.clone()),
            quantity: Set(quantity),
            price: Set(product.price),
            subtotal: Set(line_total),
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(item));

        Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
            .col_expr(ProdCol::UpdatedAt, Expr::value(now))
            .filter(ProdCol::Id.eq(product.id))
            .exec(&txn)
            .await?;
    }

    // Only the lines that were priced; a line added meanwhile stays in the cart.
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::Id.is_in(lines.iter().map(|line| line.id)))
        .exec(&txn)
        .await?;

    notify(
        &txn,
        user.user_id,
        NotificationKind::Order,
        "Order created",
        format!(
            "Your order {} has been created. Please complete payment.",
            order.order_number
        ),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total = %order.total_amount,
        discount = %order.discount_amount,
        "order created"
    );

    Ok(ApiResponse::item(
        "Order created",
        CheckoutResponse {
            order: Order::from(order),
            items,
            coupon_message: coupon.message,
        },
    ))
}
