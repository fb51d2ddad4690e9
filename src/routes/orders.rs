use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        orders::{CheckoutPreview, CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
        payments::{PayOrderRequest, PaymentResult, RefundRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Refund,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{order_service, payment_service, refund_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", get(checkout_preview).post(checkout))
        .route("/{id}", get(get_order))
        .route("/{id}/pay", post(pay_order))
        .route("/{id}/refund", post(request_refund))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses((status = 200, description = "Orders of the current user", body = ApiResponse<OrderList>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/checkout",
    responses(
        (status = 200, description = "Cart and saved shipping details", body = ApiResponse<CheckoutPreview>),
        (status = 400, description = "Empty cart")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout_preview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CheckoutPreview>>> {
    let resp = order_service::checkout_preview(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order created from cart", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Empty cart, missing shipping info or insufficient stock")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let resp = order_service::checkout(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/{id}", tag = "Orders")]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/pay",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Order paid", body = ApiResponse<PaymentResult>),
        (status = 400, description = "Order is not pending or method unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayOrderRequest>,
) -> AppResult<Json<ApiResponse<PaymentResult>>> {
    let resp = payment_service::pay_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/refund",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund requested", body = ApiResponse<Refund>),
        (status = 400, description = "Order not refundable or refund already outstanding")
    ),
    security(("bearer_auth" = [])),
    tag = "Refunds"
)]
pub async fn request_refund(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RefundRequest>,
) -> AppResult<Json<ApiResponse<Refund>>> {
    let resp = refund_service::request_refund(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
