use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{SystemLogEntry, log_admin_action},
    dto::admin::{CouponList, CreateCouponRequest},
    entity::{
        Coupons,
        coupons::{ActiveModel as CouponActive, Column as CouponCol},
        enums::{DiscountType, LogAction},
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::{AuthUser, RequestContext, ensure_admin},
    models::Coupon,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_coupons(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CouponList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();
    let finder = Coupons::find().order_by_desc(CouponCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Coupon::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        CouponList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

fn validate(payload: &CreateCouponRequest) -> AppResult<String> {
    let code = payload.code.trim();
    if code.is_empty() {
        return Err(AppError::bad_request("Coupon code is required"));
    }
    ensure_max_len("Coupon code", code, 50)?;
    if payload.discount_value <= Decimal::ZERO {
        return Err(AppError::bad_request("Discount value must be greater than zero"));
    }
    if payload.discount_type == DiscountType::Percentage
        && payload.discount_value > Decimal::ONE_HUNDRED
    {
        return Err(AppError::bad_request("Percentage discount cannot exceed 100"));
    }
    if payload.min_purchase < Decimal::ZERO {
        return Err(AppError::bad_request("Minimum purchase cannot be negative"));
    }
    if payload.max_discount.is_some_and(|cap| cap <= Decimal::ZERO) {
        return Err(AppError::bad_request("Maximum discount must be greater than zero"));
    }
    if payload.valid_from >= payload.valid_until {
        return Err(AppError::bad_request("valid_from must be before valid_until"));
    }
    if payload.usage_limit.is_some_and(|limit| limit < 1) {
        return Err(AppError::bad_request("Usage limit must be at least 1"));
    }
    Ok(code.to_string())
}

pub async fn create_coupon(
    state: &AppState,
    ctx: &RequestContext,
    payload: CreateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    ensure_admin(&ctx.user)?;
    let code = validate(&payload)?;

    let taken = Coupons::find()
        .filter(CouponCol::Code.eq(code.as_str()))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(AppError::bad_request("Coupon code is already taken"));
    }

    let coupon = CouponActive {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        description: Set(payload.description),
        discount_type: Set(payload.discount_type),
        discount_value: Set(payload.discount_value),
        min_purchase: Set(payload.min_purchase),
        max_discount: Set(payload.max_discount),
        valid_from: Set(payload.valid_from.into()),
        valid_until: Set(payload.valid_until.into()),
        usage_limit: Set(payload.usage_limit),
        used_count: Set(0),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Create,
            "Coupon",
            coupon.id,
            format!("Created coupon {}", coupon.code),
        ),
    )
    .await;

    Ok(ApiResponse::item("Coupon created", Coupon::from(coupon)))
}
