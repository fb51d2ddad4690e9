use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    cart_items, categories, coupons, customer_profiles,
    enums::{
        DiscountType, FaqCategory, LogAction, NotificationKind, OrderStatus, ProductStatus,
        RefundStatus, TicketPriority, TicketStatus, TransactionStatus,
    },
    faqs, notifications, order_items, orders, payment_accounts, payment_methods,
    payment_transactions, product_price_history, product_questions, product_reviews,
    product_tracking, products, refunds, system_logs, ticket_messages, tickets, users,
};

type DbTime = sea_orm::prelude::DateTimeWithTimeZone;

fn utc(dt: DbTime) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerProfile {
    pub user_id: Uuid,
    pub phone: String,
    pub address: String,
    pub birth_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl From<customer_profiles::Model> for CustomerProfile {
    fn from(model: customer_profiles::Model) -> Self {
        Self {
            user_id: model.user_id,
            phone: model.phone,
            address: model.address,
            birth_date: model.birth_date,
            updated_at: utc(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            parent_id: model.parent_id,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub price: Decimal,
    pub stock: i32,
    pub status: ProductStatus,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category_id: model.category_id,
            price: model.price,
            stock: model.stock,
            status: model.status,
            view_count: model.view_count,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceHistoryEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub price: Decimal,
    pub changed_at: DateTime<Utc>,
}

impl From<product_price_history::Model> for PriceHistoryEntry {
    fn from(model: product_price_history::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            price: model.price,
            changed_at: utc(model.changed_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_reviews::Model> for Review {
    fn from(model: product_reviews::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            rating: model.rating,
            comment: model.comment,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub question: String,
    pub answer: Option<String>,
    pub answered_by: Option<Uuid>,
    pub answered_at: Option<DateTime<Utc>>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<product_questions::Model> for Question {
    fn from(model: product_questions::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            question: model.question,
            answer: model.answer,
            answered_by: model.answered_by,
            answered_at: model.answered_at.map(utc),
            is_public: model.is_public,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<cart_items::Model> for CartItem {
    fn from(model: cart_items::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            quantity: model.quantity,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Decimal,
    pub max_discount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
}

impl From<coupons::Model> for Coupon {
    fn from(model: coupons::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            description: model.description,
            discount_type: model.discount_type,
            discount_value: model.discount_value,
            min_purchase: model.min_purchase,
            max_discount: model.max_discount,
            valid_from: utc(model.valid_from),
            valid_until: utc(model.valid_until),
            usage_limit: model.usage_limit,
            used_count: model.used_count,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub subtotal_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub coupon_id: Option<Uuid>,
    pub shipping_address: String,
    pub shipping_phone: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            user_id: model.user_id,
            status: model.status,
            subtotal_amount: model.subtotal_amount,
            discount_amount: model.discount_amount,
            total_amount: model.total_amount,
            coupon_id: model.coupon_id,
            shipping_address: model.shipping_address,
            shipping_phone: model.shipping_phone,
            notes: model.notes,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            product_name: model.product_name,
            quantity: model.quantity,
            price: model.price,
            subtotal: model.subtotal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
}

impl From<payment_methods::Model> for PaymentMethod {
    fn from(model: payment_methods::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            description: model.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentAccount {
    pub id: Uuid,
    pub payment_method_id: Uuid,
    pub account_name: String,
    /// Method-specific details; card and account numbers keep only their last
    /// four digits.
    #[schema(value_type = Object)]
    pub account_info: Value,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<payment_accounts::Model> for PaymentAccount {
    fn from(model: payment_accounts::Model) -> Self {
        Self {
            id: model.id,
            payment_method_id: model.payment_method_id,
            account_name: model.account_name,
            account_info: model.account_info,
            is_default: model.is_default,
            is_active: model.is_active,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub transaction_number: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[schema(value_type = Option<Object>)]
    pub response_data: Option<Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<payment_transactions::Model> for PaymentTransaction {
    fn from(model: payment_transactions::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            user_id: model.user_id,
            payment_method_id: model.payment_method_id,
            transaction_number: model.transaction_number,
            amount: model.amount,
            status: model.status,
            response_data: model.response_data,
            error_message: model.error_message,
            created_at: utc(model.created_at),
            completed_at: model.completed_at.map(utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Refund {
    pub id: Uuid,
    pub payment_transaction_id: Uuid,
    pub order_id: Uuid,
    pub refund_number: String,
    pub amount: Decimal,
    pub reason: String,
    pub status: RefundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<refunds::Model> for Refund {
    fn from(model: refunds::Model) -> Self {
        Self {
            id: model.id,
            payment_transaction_id: model.payment_transaction_id,
            order_id: model.order_id,
            refund_number: model.refund_number,
            amount: model.amount,
            reason: model.reason,
            status: model.status,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
            completed_at: model.completed_at.map(utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for Notification {
    fn from(model: notifications::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            title: model.title,
            message: model.message,
            is_read: model.is_read,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Tracking {
    pub id: Uuid,
    pub product_id: Uuid,
    pub track_price: bool,
    pub track_stock: bool,
    pub track_status: bool,
    pub created_at: DateTime<Utc>,
}

impl From<product_tracking::Model> for Tracking {
    fn from(model: product_tracking::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            track_price: model.track_price,
            track_stock: model.track_stock,
            track_status: model.track_status,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assigned_to: Option<Uuid>,
    pub related_order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<tickets::Model> for Ticket {
    fn from(model: tickets::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            subject: model.subject,
            description: model.description,
            status: model.status,
            priority: model.priority,
            assigned_to: model.assigned_to,
            related_order_id: model.related_order_id,
            created_at: utc(model.created_at),
            updated_at: utc(model.updated_at),
            resolved_at: model.resolved_at.map(utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketMessage {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub is_from_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ticket_messages::Model> for TicketMessage {
    fn from(model: ticket_messages::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            user_id: model.user_id,
            message: model.message,
            is_from_staff: model.is_from_staff,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Faq {
    pub id: Uuid,
    pub category: FaqCategory,
    pub question: String,
    pub answer: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<faqs::Model> for Faq {
    fn from(model: faqs::Model) -> Self {
        Self {
            id: model.id,
            category: model.category,
            question: model.question,
            answer: model.answer,
            sort_order: model.sort_order,
            is_active: model.is_active,
            view_count: model.view_count,
            created_at: utc(model.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: LogAction,
    pub model_name: String,
    pub object_id: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<system_logs::Model> for SystemLog {
    fn from(model: system_logs::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            model_name: model.model_name,
            object_id: model.object_id,
            description: model.description,
            ip_address: model.ip_address,
            created_at: utc(model.created_at),
        }
    }
}
