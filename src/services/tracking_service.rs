use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::favorites::{TrackRequest, TrackedProduct, TrackedProductList, TrackingToggle},
    entity::{
        ProductTracking, Products,
        enums::NotificationKind,
        product_price_history::ActiveModel as PriceHistoryActive,
        product_tracking::{ActiveModel as TrackingActive, Column as TrackingCol},
        products::Model as ProductModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Product, Tracking},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::notification_service::notify,
    state::AppState,
};

pub async fn track_product(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: TrackRequest,
) -> AppResult<ApiResponse<TrackingToggle>> {
    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let existing = ProductTracking::find()
        .filter(
            Condition::all()
                .add(TrackingCol::UserId.eq(user.user_id))
                .add(TrackingCol::ProductId.eq(product_id)),
        )
        .one(&state.orm)
        .await?;

    match existing {
        Some(tracking) => {
            let mut active: TrackingActive = tracking.into();
            active.track_price = Set(payload.track_price);
            active.track_stock = Set(payload.track_stock);
            active.track_status = Set(payload.track_status);
            active.update(&state.orm).await?;
        }
        None => {
            TrackingActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(product_id),
                track_price: Set(payload.track_price),
                track_stock: Set(payload.track_stock),
                track_status: Set(payload.track_status),
                ..Default::default()
            }
            .insert(&state.orm)
            .await?;
        }
    }

    Ok(ApiResponse::item(
        "Product tracked",
        TrackingToggle { is_tracked: true },
    ))
}

pub async fn untrack_product(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<TrackingToggle>> {
    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    ProductTracking::delete_many()
        .filter(
            Condition::all()
                .add(TrackingCol::UserId.eq(user.user_id))
                .add(TrackingCol::ProductId.eq(product_id)),
        )
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::item(
        "Product untracked",
        TrackingToggle { is_tracked: false },
    ))
}

pub async fn list_tracked(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<TrackedProductList>> {
    let (page, limit, offset) = pagination.normalize_with_default(12);
    let finder = ProductTracking::find()
        .filter(TrackingCol::UserId.eq(user.user_id))
        .order_by_desc(TrackingCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await?;
    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(tracking, product)| {
            product.map(|product| TrackedProduct {
                tracking: Tracking::from(tracking),
                product: Product::from(product),
            })
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        TrackedProductList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

/// Records a new price for `product` and tells every price tracker about it.
///
/// Must be called inside the transaction that wrote the price. Appends one
/// history row and one promotion notification per tracker with `track_price`
/// set. Returns how many trackers were notified.
pub async fn record_price_change(
    txn: &DatabaseTransaction,
    product: &ProductModel,
    new_price: Decimal,
) -> Result<u64, DbErr> {
    PriceHistoryActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product.id),
        price: Set(new_price),
        changed_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?;

    let trackers = ProductTracking::find()
        .filter(
            Condition::all()
                .add(TrackingCol::ProductId.eq(product.id))
                .add(TrackingCol::TrackPrice.eq(true)),
        )
        .all(txn)
        .await?;

    for tracker in &trackers {
        notify(
            txn,
            tracker.user_id,
            NotificationKind::Promotion,
            "Price changed",
            format!(
                "{} you are tracking is now priced at {}",
                product.name, new_price
            ),
        )
        .await?;
    }

    let notified = trackers.len() as u64;
    tracing::info!(product_id = %product.id, price = %new_price, notified, "price change fanned out");
    Ok(notified)
}
