use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod params;
pub mod payments;
pub mod profile;
pub mod support;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", catalog::categories_router())
        .nest("/products", catalog::products_router())
        .nest("/profile", profile::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::payments_router())
        .nest("/refunds", payments::refunds_router())
        .nest("/favorites", favorites::favorites_router())
        .nest("/tracking", favorites::tracking_router())
        .nest("/notifications", notifications::router())
        .nest("/support", support::router())
        .nest("/admin", admin::router())
}
