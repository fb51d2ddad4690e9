use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartLine, CartList, UpdateCartItemRequest},
    entity::{
        CartItems, Products,
        cart_items::{ActiveModel as CartActive, Column as CartCol, Model as CartModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, Product},
    pricing::line_subtotal,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The caller's cart lines priced at current product prices.
pub(crate) async fn load_cart(state: &AppState, user: &AuthUser) -> AppResult<CartList> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let mut total = Decimal::ZERO;
    let mut items = Vec::with_capacity(rows.len());
    for (line, product) in rows {
        let Some(product) = product else { continue };
        let subtotal = line_subtotal(product.price, line.quantity);
        total += subtotal;
        items.push(CartLine {
            id: line.id,
            product: Product::from(product),
            quantity: line.quantity,
            subtotal,
        });
    }

    Ok(CartList { items, total })
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let cart = load_cart(state, user).await?;
    Ok(ApiResponse::success("OK", cart, Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity < 1 {
        return Err(AppError::bad_request("Quantity must be at least 1"));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if product.stock < payload.quantity {
        return Err(AppError::bad_request("Insufficient stock"));
    }

    let existing = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::UserId.eq(user.user_id))
                .add(CartCol::ProductId.eq(product.id)),
        )
        .one(&state.orm)
        .await?;

    let line = match existing {
        Some(line) => {
            let quantity = line.quantity.saturating_add(payload.quantity).min(product.stock);
            let mut active: CartActive = line.into();
            active.quantity = Set(quantity);
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(product.id),
                quantity: Set(payload.quantity),
                ..Default::default()
            }
            .insert(&state.orm)
            .await?
        }
    };

    tracing::debug!(user_id = %user.user_id, product_id = %product.id, quantity = line.quantity, "cart line saved");

    Ok(ApiResponse::item(
        format!("Added {} to cart", product.name),
        CartItem::from(line),
    ))
}

async fn find_own_line(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<CartModel> {
    let line = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::Id.eq(id))
                .add(CartCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;
    match line {
        Some(line) => Ok(line),
        None => Err(AppError::NotFound),
    }
}

/// Sets the quantity of a cart line and returns the refreshed cart. A
/// quantity of zero or less removes the line.
pub async fn update_cart_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartList>> {
    let line = find_own_line(state, user, id).await?;

    if payload.quantity <= 0 {
        line.delete(&state.orm).await?;
        return refreshed(state, user, "Removed from cart").await;
    }

    let product = line.find_related(Products).one(&state.orm).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    if payload.quantity > product.stock {
        return Err(AppError::bad_request("Insufficient stock"));
    }

    let mut active: CartActive = line.into();
    active.quantity = Set(payload.quantity);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    refreshed(state, user, "Cart updated").await
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CartList>> {
    let line = find_own_line(state, user, id).await?;
    line.delete(&state.orm).await?;
    refreshed(state, user, "Removed from cart").await
}

async fn refreshed(
    state: &AppState,
    user: &AuthUser,
    message: &str,
) -> AppResult<ApiResponse<CartList>> {
    let mut resp = list_cart(state, user).await?;
    resp.message = message.to_string();
    Ok(resp)
}
