use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::{SystemLogEntry, log_admin_action},
    dto::{
        admin::{
            AnswerQuestionRequest, DashboardStats, PopularProduct, QuestionList, SystemLogList,
            UpdateOrderStatusRequest, UserList,
        },
        orders::{OrderList, OrderWithItems},
    },
    entity::{
        Orders, ProductQuestions, Products, SystemLogs, Users,
        enums::{LogAction, NotificationKind},
        orders::{self, ActiveModel as OrderActive, Column as OrderCol},
        product_questions::{ActiveModel as QuestionActive, Column as QuestionCol},
        system_logs::Column as LogCol,
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, RequestContext, ensure_admin},
    models::{Order, Question, SystemLog, User},
    response::{ApiResponse, Meta},
    routes::params::{AnswerFilter, LogListQuery, OrderListQuery, QuestionListQuery, SortOrder, UserListQuery},
    services::{
        notification_service::notify,
        order_service::{load_items, lock_order},
        product_service::DEFAULT_LOW_STOCK_THRESHOLD,
    },
    state::AppState,
};

#[derive(Debug, FromRow)]
struct DashboardCounts {
    total_orders: i64,
    total_revenue: Decimal,
    today_orders: i64,
    today_revenue: Decimal,
    pending_orders: i64,
    pending_refunds: i64,
    pending_questions: i64,
    open_tickets: i64,
    low_stock_products: i64,
}

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;

    let counts: DashboardCounts = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM orders) AS total_orders,
            (SELECT COALESCE(SUM(amount), 0) FROM payment_transactions
                WHERE status = 'completed') AS total_revenue,
            (SELECT COUNT(*) FROM orders
                WHERE created_at::date = CURRENT_DATE) AS today_orders,
            (SELECT COALESCE(SUM(amount), 0) FROM payment_transactions
                WHERE status = 'completed' AND completed_at::date = CURRENT_DATE) AS today_revenue,
            (SELECT COUNT(*) FROM orders WHERE status = 'pending') AS pending_orders,
            (SELECT COUNT(*) FROM refunds WHERE status = 'pending') AS pending_refunds,
            (SELECT COUNT(*) FROM product_questions
                WHERE answer IS NULL OR answer = '') AS pending_questions,
            (SELECT COUNT(*) FROM customer_service_tickets WHERE status = 'open') AS open_tickets,
            (SELECT COUNT(*) FROM products WHERE stock < $1) AS low_stock_products
        "#,
    )
    .bind(DEFAULT_LOW_STOCK_THRESHOLD)
    .fetch_one(&state.pool)
    .await?;

    let popular_products: Vec<PopularProduct> = sqlx::query_as(
        r#"
        SELECT p.id, p.name, COUNT(oi.id) AS order_count
        FROM products p
        LEFT JOIN order_items oi ON oi.product_id = p.id
        GROUP BY p.id, p.name
        ORDER BY order_count DESC, p.name
        LIMIT 10
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let recent_orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .limit(10)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::item(
        "OK",
        DashboardStats {
            total_orders: counts.total_orders,
            total_revenue: counts.total_revenue,
            today_orders: counts.today_orders,
            today_revenue: counts.today_revenue,
            pending_orders: counts.pending_orders,
            pending_refunds: counts.pending_refunds,
            pending_questions: counts.pending_questions,
            open_tickets: counts.open_tickets,
            low_stock_products: counts.low_stock_products,
            recent_orders,
            popular_products,
        },
    ))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Orders, OrderCol::OrderNumber)).ilike(pattern.clone()))
                .add(Expr::col((Users, UserCol::Email)).ilike(pattern)),
        );
    }

    let mut finder = Orders::find()
        .join(JoinType::InnerJoin, orders::Relation::Users.def())
        .filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = match Orders::find_by_id(id).one(&state.orm).await? {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    let items = load_items(&state.orm, order.id).await?;
    Ok(ApiResponse::item(
        "OK",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
    ))
}

pub async fn update_order_status(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(&ctx.user)?;

    let txn = state.orm.begin().await?;
    let order = lock_order(&txn, id, None).await?;
    let old_status = order.status;
    let new_status = payload.status;

    let mut active: OrderActive = order.into();
    active.status = Set(new_status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    notify(
        &txn,
        order.user_id,
        NotificationKind::Order,
        "Order status updated",
        format!(
            "Your order {} is now {}",
            order.order_number,
            new_status.label()
        ),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        from = %old_status.to_value(),
        to = %new_status.to_value(),
        "order status changed"
    );

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Update,
            "Order",
            order.id,
            format!(
                "Order status changed from {} to {}",
                old_status.to_value(),
                new_status.to_value()
            ),
        ),
    )
    .await;

    Ok(ApiResponse::item("Order status updated", Order::from(order)))
}

pub async fn list_questions(
    state: &AppState,
    user: &AuthUser,
    query: QuestionListQuery,
) -> AppResult<ApiResponse<QuestionList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = ProductQuestions::find().order_by_desc(QuestionCol::CreatedAt);
    finder = match query.status {
        Some(AnswerFilter::Answered) => finder.filter(
            Condition::all()
                .add(QuestionCol::Answer.is_not_null())
                .add(QuestionCol::Answer.ne("")),
        ),
        Some(AnswerFilter::Unanswered) => finder.filter(
            Condition::any()
                .add(QuestionCol::Answer.is_null())
                .add(QuestionCol::Answer.eq("")),
        ),
        None => finder,
    };

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Question::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        QuestionList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn answer_question(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
    payload: AnswerQuestionRequest,
) -> AppResult<ApiResponse<Question>> {
    ensure_admin(&ctx.user)?;
    let answer = payload.answer.trim();
    if answer.is_empty() {
        return Err(AppError::bad_request("Answer is required"));
    }

    let question = match ProductQuestions::find_by_id(id).one(&state.orm).await? {
        Some(q) => q,
        None => return Err(AppError::NotFound),
    };
    let product_name = Products::find_by_id(question.product_id)
        .one(&state.orm)
        .await?
        .map(|p| p.name)
        .unwrap_or_default();

    let now = Utc::now();
    let txn = state.orm.begin().await?;
    let mut active: QuestionActive = question.into();
    active.answer = Set(Some(answer.to_string()));
    active.answered_by = Set(Some(ctx.user_id()));
    active.answered_at = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    let question = active.update(&txn).await?;

    notify(
        &txn,
        question.user_id,
        NotificationKind::System,
        "Question answered",
        format!("Your question about {product_name} has been answered"),
    )
    .await?;
    txn.commit().await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Update,
            "ProductQuestion",
            question.id,
            format!("Answered question on {product_name}"),
        ),
    )
    .await;

    Ok(ApiResponse::item("Question answered", Question::from(question)))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Users::find().order_by_desc(UserCol::CreatedAt);
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        finder = finder.filter(Expr::col(UserCol::Email).ilike(format!("%{q}%")));
    }

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        UserList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn list_system_logs(
    state: &AppState,
    user: &AuthUser,
    query: LogListQuery,
) -> AppResult<ApiResponse<SystemLogList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize_with_default(50);

    let mut finder = SystemLogs::find().order_by_desc(LogCol::CreatedAt);
    if let Some(action) = query.action {
        finder = finder.filter(LogCol::Action.eq(action));
    }

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SystemLog::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        SystemLogList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}
