use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::favorites::{FavoriteProductList, FavoriteToggle},
    entity::{
        Favorites, Products,
        favorites::{ActiveModel as FavoriteActive, Column as FavoriteCol},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteProductList>> {
    let (page, limit, offset) = pagination.normalize_with_default(12);
    let finder = Favorites::find()
        .filter(FavoriteCol::UserId.eq(user.user_id))
        .order_by_desc(FavoriteCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .find_also_related(Products)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(_, product)| product.map(Product::from))
        .collect();

    Ok(ApiResponse::success(
        "OK",
        FavoriteProductList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

/// Adds the product to the caller's favorites, or removes it if already there.
pub async fn toggle_favorite(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<FavoriteToggle>> {
    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let existing = Favorites::find()
        .filter(
            Condition::all()
                .add(FavoriteCol::UserId.eq(user.user_id))
                .add(FavoriteCol::ProductId.eq(product_id)),
        )
        .one(&state.orm)
        .await?;

    let is_favorited = match existing {
        Some(favorite) => {
            favorite.delete(&state.orm).await?;
            false
        }
        None => {
            FavoriteActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(product_id),
                ..Default::default()
            }
            .insert(&state.orm)
            .await?;
            true
        }
    };

    let message = if is_favorited {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(ApiResponse::item(message, FavoriteToggle { is_favorited }))
}

pub(crate) async fn is_favorited(
    state: &AppState,
    user_id: Uuid,
    product_id: Uuid,
) -> AppResult<bool> {
    let count = Favorites::find()
        .filter(
            Condition::all()
                .add(FavoriteCol::UserId.eq(user_id))
                .add(FavoriteCol::ProductId.eq(product_id)),
        )
        .count(&state.orm)
        .await?;
    Ok(count > 0)
}
