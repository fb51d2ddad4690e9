use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin, auth as auth_dto, cart as cart_dto, catalog as catalog_dto,
        favorites as favorites_dto, notifications as notifications_dto, orders as orders_dto,
        payments as payments_dto, profile as profile_dto, support as support_dto,
    },
    entity::enums,
    models,
    response::{ApiResponse, IdResponse, Meta},
    routes::{
        admin as admin_routes, auth, cart, catalog, favorites, health, notifications, orders,
        params, payments, profile, support,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::me,
        auth::register,
        catalog::list_categories,
        catalog::list_products,
        catalog::get_product,
        catalog::price_history,
        catalog::add_review,
        catalog::ask_question,
        catalog::toggle_favorite,
        catalog::track_product,
        catalog::untrack_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout_preview,
        orders::checkout,
        orders::get_order,
        orders::pay_order,
        orders::request_refund,
        payments::list_payment_methods,
        payments::list_transactions,
        payments::get_transaction,
        payments::list_accounts,
        payments::add_account,
        payments::set_default_account,
        payments::delete_account,
        profile::get_profile,
        profile::update_profile,
        payments::list_refunds,
        payments::get_refund,
        favorites::list_favorites,
        favorites::list_tracked,
        notifications::list_notifications,
        notifications::mark_read,
        support::create_ticket,
        support::list_tickets,
        support::get_ticket,
        support::post_message,
        support::list_faqs,
        admin_routes::dashboard,
        admin_routes::list_products,
        admin_routes::create_product,
        admin_routes::update_product,
        admin_routes::delete_product,
        admin_routes::list_low_stock,
        admin_routes::create_category,
        admin_routes::list_all_orders,
        admin_routes::get_order_admin,
        admin_routes::update_order_status,
        admin_routes::list_all_refunds,
        admin_routes::process_refund,
        admin_routes::list_questions,
        admin_routes::answer_question,
        admin_routes::list_all_tickets,
        admin_routes::get_ticket_admin,
        admin_routes::act_on_ticket,
        admin_routes::list_faqs_admin,
        admin_routes::create_faq,
        admin_routes::update_faq,
        admin_routes::delete_faq,
        admin_routes::list_coupons,
        admin_routes::create_coupon,
        admin_routes::list_users,
        admin_routes::list_system_logs,
    ),
    components(
        schemas(
            models::User,
            models::Category,
            models::Product,
            models::PriceHistoryEntry,
            models::Review,
            models::Question,
            models::CartItem,
            IdResponse,
            models::Coupon,
            models::Order,
            models::OrderItem,
            models::PaymentMethod,
            models::PaymentAccount,
            models::CustomerProfile,
            models::PaymentTransaction,
            models::Refund,
            models::Notification,
            models::Tracking,
            models::Ticket,
            models::TicketMessage,
            models::Faq,
            models::SystemLog,
            enums::ProductStatus,
            enums::OrderStatus,
            enums::TransactionStatus,
            enums::RefundStatus,
            enums::DiscountType,
            enums::NotificationKind,
            enums::TicketStatus,
            enums::TicketPriority,
            enums::FaqCategory,
            enums::LogAction,
            auth_dto::RegisterRequest,
            auth_dto::LoginRequest,
            auth_dto::LoginResponse,
            catalog_dto::CreateProductRequest,
            catalog_dto::UpdateProductRequest,
            catalog_dto::CreateCategoryRequest,
            catalog_dto::ProductList,
            catalog_dto::CategoryList,
            catalog_dto::ProductDetail,
            catalog_dto::ProductUpdateResult,
            catalog_dto::ReviewRequest,
            catalog_dto::AskQuestionRequest,
            catalog_dto::PriceHistoryList,
            cart_dto::AddToCartRequest,
            cart_dto::UpdateCartItemRequest,
            cart_dto::CartList,
            cart_dto::CartLine,
            orders_dto::CheckoutPreview,
            orders_dto::CheckoutRequest,
            orders_dto::CheckoutResponse,
            orders_dto::OrderWithItems,
            orders_dto::OrderList,
            payments_dto::PayOrderRequest,
            payments_dto::PaymentResult,
            payments_dto::PaymentMethodList,
            payments_dto::TransactionList,
            payments_dto::AccountDetails,
            payments_dto::AddPaymentAccountRequest,
            payments_dto::PaymentAccountList,
            profile_dto::UpdateProfileRequest,
            payments_dto::RefundRequest,
            payments_dto::RefundList,
            payments_dto::RefundDecision,
            payments_dto::ProcessRefundRequest,
            payments_dto::RefundDecisionResult,
            favorites_dto::FavoriteProductList,
            favorites_dto::FavoriteToggle,
            favorites_dto::TrackRequest,
            favorites_dto::TrackingToggle,
            favorites_dto::TrackedProduct,
            favorites_dto::TrackedProductList,
            notifications_dto::NotificationList,
            notifications_dto::MarkReadResult,
            support_dto::CreateTicketRequest,
            support_dto::TicketMessageRequest,
            support_dto::TicketAction,
            support_dto::TicketActionRequest,
            support_dto::TicketDetail,
            support_dto::TicketList,
            support_dto::FaqRequest,
            support_dto::FaqList,
            admin::UpdateOrderStatusRequest,
            admin::AnswerQuestionRequest,
            admin::CreateCouponRequest,
            admin::PopularProduct,
            admin::DashboardStats,
            admin::UserList,
            admin::SystemLogList,
            admin::QuestionList,
            admin::CouponList,
            params::Pagination,
            params::SortOrder,
            params::ProductSort,
            params::AnswerFilter,
            health::HealthData,
            Meta,
            ApiResponse<models::Product>,
            ApiResponse<catalog_dto::ProductList>,
            ApiResponse<orders_dto::CheckoutResponse>,
            ApiResponse<orders_dto::OrderList>,
            ApiResponse<orders_dto::OrderWithItems>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Catalog", description = "Categories, products, reviews and questions"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Payments", description = "Payment methods, saved accounts and transactions"),
        (name = "Refunds", description = "Refund requests"),
        (name = "Profile", description = "Customer profile and saved shipping details"),
        (name = "Favorites", description = "Favorites and product tracking"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Support", description = "Customer service tickets and FAQ"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
