use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::favorites::{FavoriteProductList, TrackedProductList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::Pagination,
    services::{favorite_service, tracking_service},
    state::AppState,
};

pub fn favorites_router() -> Router<AppState> {
    Router::new().route("/", get(list_favorites))
}

pub fn tracking_router() -> Router<AppState> {
    Router::new().route("/", get(list_tracked))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    params(Pagination),
    responses((status = 200, description = "Favorite products", body = ApiResponse<FavoriteProductList>)),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<FavoriteProductList>>> {
    let resp = favorite_service::list_favorites(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tracking",
    params(Pagination),
    responses((status = 200, description = "Tracked products", body = ApiResponse<TrackedProductList>)),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_tracked(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TrackedProductList>>> {
    let resp = tracking_service::list_tracked(&state, &user, pagination).await?;
    Ok(Json(resp))
}
