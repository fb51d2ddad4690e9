use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::{
            AskQuestionRequest, CategoryList, PriceHistoryList, ProductDetail, ProductList,
            ReviewRequest,
        },
        favorites::{FavoriteToggle, TrackRequest, TrackingToggle},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Question, Review},
    response::ApiResponse,
    routes::params::{Pagination, ProductQuery},
    services::{favorite_service, product_service, tracking_service},
    state::AppState,
};

pub fn categories_router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

pub fn products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .route("/{id}/price-history", get(price_history))
        .route("/{id}/reviews", post(add_review))
        .route("/{id}/questions", post(ask_question))
        .route("/{id}/favorite", post(toggle_favorite))
        .route("/{id}/track", post(track_product).delete(untrack_product))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "List categories", body = ApiResponse<CategoryList>)),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = product_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses((status = 200, description = "List active products", body = ApiResponse<ProductList>)),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found")
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::get_product(&state, viewer.as_ref(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/price-history",
    params(("id" = Uuid, Path, description = "Product id"), Pagination),
    responses((status = 200, description = "Price history", body = ApiResponse<PriceHistoryList>)),
    tag = "Catalog"
)]
pub async fn price_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PriceHistoryList>>> {
    let resp = product_service::list_price_history(&state, id, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review created or updated", body = ApiResponse<Review>),
        (status = 400, description = "Not a buyer of this product or invalid rating")
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn add_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = product_service::add_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/questions",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = AskQuestionRequest,
    responses((status = 200, description = "Question submitted", body = ApiResponse<Question>)),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn ask_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AskQuestionRequest>,
) -> AppResult<Json<ApiResponse<Question>>> {
    let resp = product_service::ask_question(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/favorite",
    params(("id" = Uuid, Path, description = "Product id")),
    responses((status = 200, description = "Favorite toggled", body = ApiResponse<FavoriteToggle>)),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FavoriteToggle>>> {
    let resp = favorite_service::toggle_favorite(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/track",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = TrackRequest,
    responses((status = 200, description = "Product tracked", body = ApiResponse<TrackingToggle>)),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn track_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<TrackRequest>>,
) -> AppResult<Json<ApiResponse<TrackingToggle>>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let resp = tracking_service::track_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/track",
    params(("id" = Uuid, Path, description = "Product id")),
    responses((status = 200, description = "Product untracked", body = ApiResponse<TrackingToggle>)),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn untrack_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TrackingToggle>>> {
    let resp = tracking_service::untrack_product(&state, &user, id).await?;
    Ok(Json(resp))
}
