use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::ProductStatus,
    models::{Category, PriceHistoryEntry, Product, Question, Review},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<Uuid>,
    pub price: Decimal,
    pub stock: i32,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub average_rating: f64,
    pub reviews: Vec<Review>,
    pub questions: Vec<Question>,
    pub is_favorited: bool,
    pub related_products: Vec<Product>,
}

/// Result of an admin product edit, including the price-tracking fan-out.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductUpdateResult {
    pub product: Product,
    pub price_changed: bool,
    pub trackers_notified: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AskQuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PriceHistoryList {
    #[schema(value_type = Vec<PriceHistoryEntry>)]
    pub items: Vec<PriceHistoryEntry>,
}
