pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod coupon_service;
pub mod faq_service;
pub mod favorite_service;
pub mod notification_service;
pub mod order_service;
pub mod payment_account_service;
pub mod payment_service;
pub mod product_service;
pub mod profile_service;
pub mod refund_service;
pub mod ticket_service;
pub mod tracking_service;
