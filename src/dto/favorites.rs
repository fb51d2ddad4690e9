use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Product, Tracking};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FavoriteProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteToggle {
    pub is_favorited: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrackRequest {
    #[serde(default = "default_true")]
    pub track_price: bool,
    #[serde(default = "default_true")]
    pub track_stock: bool,
    #[serde(default = "default_true")]
    pub track_status: bool,
}

impl Default for TrackRequest {
    fn default() -> Self {
        Self {
            track_price: true,
            track_stock: true,
            track_status: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingToggle {
    pub is_tracked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackedProduct {
    pub tracking: Tracking,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TrackedProductList {
    #[schema(value_type = Vec<TrackedProduct>)]
    pub items: Vec<TrackedProduct>,
}
