use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::payments::{
        AddPaymentAccountRequest, PaymentAccountList, PaymentMethodList, RefundList,
        TransactionList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{PaymentAccount, PaymentTransaction, Refund},
    response::{ApiResponse, IdResponse},
    routes::params::{Pagination, RefundListQuery},
    services::{payment_account_service, payment_service, refund_service},
    state::AppState,
};

pub fn payments_router() -> Router<AppState> {
    Router::new()
        .route("/methods", get(list_payment_methods))
        .route("/transactions", get(list_transactions))
        .route("/transactions/{id}", get(get_transaction))
        .route("/accounts", get(list_accounts).post(add_account))
        .route("/accounts/{id}", delete(delete_account))
        .route("/accounts/{id}/default", post(set_default_account))
}

pub fn refunds_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_refunds))
        .route("/{id}", get(get_refund))
}

#[utoipa::path(
    get,
    path = "/api/payments/methods",
    responses((status = 200, description = "Active payment methods", body = ApiResponse<PaymentMethodList>)),
    tag = "Payments"
)]
pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<PaymentMethodList>>> {
    let resp = payment_service::list_payment_methods(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/transactions",
    params(Pagination),
    responses((status = 200, description = "Transaction history", body = ApiResponse<TransactionList>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TransactionList>>> {
    let resp = payment_service::list_transactions(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/transactions/{id}",
    params(("id" = Uuid, Path, description = "Transaction id")),
    responses((status = 200, description = "Transaction detail", body = ApiResponse<PaymentTransaction>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentTransaction>>> {
    let resp = payment_service::get_transaction(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/accounts",
    responses((status = 200, description = "Saved payment accounts, default first", body = ApiResponse<PaymentAccountList>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentAccountList>>> {
    let resp = payment_account_service::list_accounts(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/accounts",
    request_body = AddPaymentAccountRequest,
    responses(
        (status = 200, description = "Account saved", body = ApiResponse<PaymentAccount>),
        (status = 404, description = "Payment method unknown or inactive")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn add_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddPaymentAccountRequest>,
) -> AppResult<Json<ApiResponse<PaymentAccount>>> {
    let resp = payment_account_service::add_account(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/accounts/{id}/default",
    params(("id" = Uuid, Path, description = "Payment account id")),
    responses((status = 200, description = "Account is now the default", body = ApiResponse<PaymentAccount>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn set_default_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentAccount>>> {
    let resp = payment_account_service::set_default_account(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/payments/accounts/{id}",
    params(("id" = Uuid, Path, description = "Payment account id")),
    responses((status = 200, description = "Account deleted", body = ApiResponse<IdResponse>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<IdResponse>>> {
    let resp = payment_account_service::delete_account(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/refunds",
    params(RefundListQuery),
    responses((status = 200, description = "Refunds of the current user", body = ApiResponse<RefundList>)),
    security(("bearer_auth" = [])),
    tag = "Refunds"
)]
pub async fn list_refunds(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RefundListQuery>,
) -> AppResult<Json<ApiResponse<RefundList>>> {
    let resp = refund_service::list_refunds(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/refunds/{id}", tag = "Refunds")]
pub async fn get_refund(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Refund>>> {
    let resp = refund_service::get_refund(&state, &user, id).await?;
    Ok(Json(resp))
}
