use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{
            AnswerQuestionRequest, CouponList, CreateCouponRequest, DashboardStats, QuestionList,
            SystemLogList, UpdateOrderStatusRequest, UserList,
        },
        catalog::{
            CreateCategoryRequest, CreateProductRequest, ProductList, ProductUpdateResult,
            UpdateProductRequest,
        },
        orders::{OrderList, OrderWithItems},
        payments::{ProcessRefundRequest, RefundDecisionResult, RefundList},
        support::{FaqList, FaqRequest, TicketActionRequest, TicketDetail, TicketList},
    },
    error::AppResult,
    middleware::auth::{AuthUser, RequestContext},
    models::{Category, Coupon, Faq, Order, Product, Question},
    response::{ApiResponse, IdResponse},
    routes::params::{
        AdminProductQuery, FaqQuery, LogListQuery, LowStockQuery, OrderListQuery, Pagination,
        QuestionListQuery, RefundListQuery, TicketListQuery, UserListQuery,
    },
    services::{
        admin_service, coupon_service, faq_service, product_service, refund_service,
        ticket_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/products", get(list_products).post(create_product))
        .route("/products/low-stock", get(list_low_stock))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/categories", post(create_category))
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/refunds", get(list_all_refunds))
        .route("/refunds/{id}/process", post(process_refund))
        .route("/questions", get(list_questions))
        .route("/questions/{id}/answer", post(answer_question))
        .route("/tickets", get(list_all_tickets))
        .route("/tickets/{id}", get(get_ticket_admin))
        .route("/tickets/{id}/action", post(act_on_ticket))
        .route("/faqs", get(list_faqs_admin).post(create_faq))
        .route("/faqs/{id}", put(update_faq).delete(delete_faq))
        .route("/coupons", get(list_coupons).post(create_coupon))
        .route("/users", get(list_users))
        .route("/logs", get(list_system_logs))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses((status = 200, description = "Store statistics", body = ApiResponse<DashboardStats>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = admin_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(AdminProductQuery),
    responses((status = 200, description = "All products", body = ApiResponse<ProductList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products_admin(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product fields")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::create_product(&state, &ctx, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses((status = 200, description = "Product updated", body = ApiResponse<ProductUpdateResult>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductUpdateResult>>> {
    let resp = product_service::update_product(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses((status = 200, description = "Product deleted", body = ApiResponse<IdResponse>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<IdResponse>>> {
    let resp = product_service::delete_product(&state, &ctx, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/low-stock",
    params(LowStockQuery),
    responses((status = 200, description = "Products below the stock threshold", body = ApiResponse<ProductList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_low_stock(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses((status = 200, description = "Category created", body = ApiResponse<Category>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = product_service::create_category(&state, &ctx, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderListQuery),
    responses((status = 200, description = "Get all orders (admin only)", body = ApiResponse<OrderList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses((status = 200, description = "Get any order with items (admin only)", body = ApiResponse<OrderWithItems>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses((status = 200, description = "Update order status", body = ApiResponse<Order>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/refunds",
    params(RefundListQuery),
    responses((status = 200, description = "All refunds", body = ApiResponse<RefundList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_refunds(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RefundListQuery>,
) -> AppResult<Json<ApiResponse<RefundList>>> {
    let resp = refund_service::list_all_refunds(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/refunds/{id}/process",
    params(("id" = Uuid, Path, description = "Refund id")),
    request_body = ProcessRefundRequest,
    responses(
        (status = 200, description = "Refund approved or rejected", body = ApiResponse<RefundDecisionResult>),
        (status = 400, description = "Refund already decided")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn process_refund(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProcessRefundRequest>,
) -> AppResult<Json<ApiResponse<RefundDecisionResult>>> {
    let resp = refund_service::process_refund(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/questions",
    params(QuestionListQuery),
    responses((status = 200, description = "Product questions", body = ApiResponse<QuestionList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_questions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<QuestionListQuery>,
) -> AppResult<Json<ApiResponse<QuestionList>>> {
    let resp = admin_service::list_questions(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/questions/{id}/answer",
    params(("id" = Uuid, Path, description = "Question id")),
    request_body = AnswerQuestionRequest,
    responses((status = 200, description = "Question answered", body = ApiResponse<Question>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn answer_question(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerQuestionRequest>,
) -> AppResult<Json<ApiResponse<Question>>> {
    let resp = admin_service::answer_question(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/tickets",
    params(TicketListQuery),
    responses((status = 200, description = "All support tickets", body = ApiResponse<TicketList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TicketListQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = ticket_service::list_all_tickets(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/admin/tickets/{id}", security(("bearer_auth" = [])), tag = "Admin")]
pub async fn get_ticket_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TicketDetail>>> {
    let resp = ticket_service::get_ticket_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/tickets/{id}/action",
    params(("id" = Uuid, Path, description = "Ticket id")),
    request_body = TicketActionRequest,
    responses((status = 200, description = "Ticket updated", body = ApiResponse<TicketDetail>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn act_on_ticket(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketActionRequest>,
) -> AppResult<Json<ApiResponse<TicketDetail>>> {
    let resp = ticket_service::act_on_ticket(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/faqs",
    params(FaqQuery),
    responses((status = 200, description = "All FAQs", body = ApiResponse<FaqList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_faqs_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<FaqQuery>,
) -> AppResult<Json<ApiResponse<FaqList>>> {
    let resp = faq_service::list_faqs_admin(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/faqs",
    request_body = FaqRequest,
    responses((status = 200, description = "FAQ created", body = ApiResponse<Faq>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_faq(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<FaqRequest>,
) -> AppResult<Json<ApiResponse<Faq>>> {
    let resp = faq_service::create_faq(&state, &ctx, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/faqs/{id}",
    params(("id" = Uuid, Path, description = "FAQ id")),
    request_body = FaqRequest,
    responses((status = 200, description = "FAQ updated", body = ApiResponse<Faq>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_faq(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<FaqRequest>,
) -> AppResult<Json<ApiResponse<Faq>>> {
    let resp = faq_service::update_faq(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/faqs/{id}",
    params(("id" = Uuid, Path, description = "FAQ id")),
    responses((status = 200, description = "FAQ deleted", body = ApiResponse<IdResponse>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_faq(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<IdResponse>>> {
    let resp = faq_service::delete_faq(&state, &ctx, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/coupons",
    params(Pagination),
    responses((status = 200, description = "All coupons", body = ApiResponse<CouponList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_coupons(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CouponList>>> {
    let resp = coupon_service::list_coupons(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 200, description = "Coupon created", body = ApiResponse<Coupon>),
        (status = 400, description = "Invalid coupon terms")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<CreateCouponRequest>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let resp = coupon_service::create_coupon(&state, &ctx, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserListQuery),
    responses((status = 200, description = "Registered users", body = ApiResponse<UserList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/logs",
    params(LogListQuery),
    responses((status = 200, description = "System audit log", body = ApiResponse<SystemLogList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_system_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LogListQuery>,
) -> AppResult<Json<ApiResponse<SystemLogList>>> {
    let resp = admin_service::list_system_logs(&state, &user, query).await?;
    Ok(Json(resp))
}
