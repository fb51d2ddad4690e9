use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::cart::CartLine,
    models::{Order, OrderItem},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub shipping_phone: String,
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// What the checkout form starts from: the cart and the saved shipping details.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutPreview {
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub shipping_address: String,
    pub shipping_phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Set when a coupon code was given but not applied.
    pub coupon_message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
