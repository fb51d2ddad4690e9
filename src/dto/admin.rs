use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::{DiscountType, OrderStatus},
    models::{Coupon, Order, Question, SystemLog, User},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnswerQuestionRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default)]
    pub min_purchase: Decimal,
    pub max_discount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct PopularProduct {
    pub id: Uuid,
    pub name: String,
    pub order_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub today_orders: i64,
    pub today_revenue: Decimal,
    pub pending_orders: i64,
    pub pending_refunds: i64,
    pub pending_questions: i64,
    pub open_tickets: i64,
    pub low_stock_products: i64,
    pub recent_orders: Vec<Order>,
    pub popular_products: Vec<PopularProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SystemLogList {
    #[schema(value_type = Vec<SystemLog>)]
    pub items: Vec<SystemLog>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct QuestionList {
    #[schema(value_type = Vec<Question>)]
    pub items: Vec<Question>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CouponList {
    #[schema(value_type = Vec<Coupon>)]
    pub items: Vec<Coupon>,
}
