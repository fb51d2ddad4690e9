use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, SqlErr, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit::{SystemLogEntry, log_admin_action},
    dto::payments::{
        ProcessRefundRequest, RefundDecision, RefundDecisionResult, RefundList, RefundRequest,
    },
    entity::{
        PaymentTransactions, Refunds,
        enums::{LogAction, NotificationKind, OrderStatus, RefundStatus, TransactionStatus},
        orders::{ActiveModel as OrderActive, Column as OrderCol},
        payment_transactions::{ActiveModel as TxnActive, Column as TxnCol},
        refunds::{self, ActiveModel as RefundActive, Column as RefundCol},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, RequestContext, ensure_admin},
    models::{Order, Refund},
    pricing,
    response::{ApiResponse, Meta},
    routes::params::RefundListQuery,
    services::{notification_service::notify, order_service::lock_order},
    state::AppState,
};

const OUTSTANDING_MESSAGE: &str = "A refund request for this order is already being processed";

/// Opens a refund for the caller's paid order.
pub async fn request_refund(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: RefundRequest,
) -> AppResult<ApiResponse<Refund>> {
    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(AppError::bad_request("Refund reason is required"));
    }

    let txn = state.orm.begin().await?;

    let order = lock_order(&txn, order_id, Some(user.user_id)).await?;
    if !OrderStatus::REFUNDABLE.contains(&order.status) {
        return Err(AppError::bad_request("This order cannot be refunded"));
    }

    let outstanding = Refunds::find()
        .filter(
            Condition::all()
                .add(RefundCol::OrderId.eq(order.id))
                .add(RefundCol::Status.is_in(RefundStatus::OUTSTANDING)),
        )
        .count(&txn)
        .await?;
    if outstanding > 0 {
        return Err(AppError::bad_request(OUTSTANDING_MESSAGE));
    }

    let payment = PaymentTransactions::find()
        .filter(
            Condition::all()
                .add(TxnCol::OrderId.eq(order.id))
                .add(TxnCol::Status.eq(TransactionStatus::Completed)),
        )
        .order_by_desc(TxnCol::CompletedAt)
        .one(&txn)
        .await?;
    let payment = match payment {
        Some(p) => p,
        None => return Err(AppError::bad_request("No completed payment found for this order")),
    };

    let now = Utc::now();
    let refund = RefundActive {
        id: Set(Uuid::new_v4()),
        payment_transaction_id: Set(payment.id),
        order_id: Set(order.id),
        refund_number: Set(pricing::refund_number(now)),
        amount: Set(order.total_amount),
        reason: Set(reason.to_string()),
        status: Set(RefundStatus::Pending),
        completed_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::bad_request(OUTSTANDING_MESSAGE),
        _ => AppError::from(err),
    })?;

    notify(
        &txn,
        user.user_id,
        NotificationKind::Payment,
        "Refund requested",
        format!(
            "Your refund request {} has been submitted and will be processed soon",
            refund.refund_number
        ),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(
        refund_number = %refund.refund_number,
        order_id = %refund.order_id,
        amount = %refund.amount,
        "refund requested"
    );

    Ok(ApiResponse::item("Refund requested", Refund::from(refund)))
}

pub async fn list_refunds(
    state: &AppState,
    user: &AuthUser,
    query: RefundListQuery,
) -> AppResult<ApiResponse<RefundList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(RefundCol::Status.eq(status));
    }

    let finder = Refunds::find()
        .join(sea_orm::JoinType::InnerJoin, refunds::Relation::Orders.def())
        .filter(condition)
        .order_by_desc(RefundCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Refund::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        RefundList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn get_refund(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Refund>> {
    let refund = Refunds::find()
        .join(sea_orm::JoinType::InnerJoin, refunds::Relation::Orders.def())
        .filter(
            Condition::all()
                .add(RefundCol::Id.eq(id))
                .add(OrderCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;

    match refund {
        Some(r) => Ok(ApiResponse::item("OK", Refund::from(r))),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_all_refunds(
    state: &AppState,
    user: &AuthUser,
    query: RefundListQuery,
) -> AppResult<ApiResponse<RefundList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Refunds::find().order_by_desc(RefundCol::CreatedAt);
    if let Some(status) = query.status {
        finder = finder.filter(RefundCol::Status.eq(status));
    }

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Refund::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        RefundList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

/// Approves or rejects an outstanding refund.
///
/// Approval moves the refund to completed, the order to refunded and the
/// originating payment to refunded, all in one transaction.
pub async fn process_refund(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
    payload: ProcessRefundRequest,
) -> AppResult<ApiResponse<RefundDecisionResult>> {
    ensure_admin(&ctx.user)?;

    let txn = state.orm.begin().await?;

    let refund = Refunds::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let refund = match refund {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if !refund.status.is_outstanding() {
        return Err(AppError::bad_request("This refund has already been decided"));
    }

    let order = lock_order(&txn, refund.order_id, None).await?;
    let buyer_id = order.user_id;
    let now = Utc::now();
    let decision = payload.action;

    let mut active: RefundActive = refund.into();
    active.status = Set(decision.resulting_status());
    active.updated_at = Set(now.into());
    if decision == RefundDecision::Approve {
        active.completed_at = Set(Some(now.into()));
    }
    let refund = active.update(&txn).await?;

    let order = if decision == RefundDecision::Approve {
        let mut order: OrderActive = order.into();
        order.status = Set(OrderStatus::Refunded);
        order.updated_at = Set(now.into());
        let order = order.update(&txn).await?;

        if let Some(payment) = PaymentTransactions::find_by_id(refund.payment_transaction_id)
            .one(&txn)
            .await?
        {
            let mut payment: TxnActive = payment.into();
            payment.status = Set(TransactionStatus::Refunded);
            payment.updated_at = Set(now.into());
            payment.update(&txn).await?;
        }
        order
    } else {
        order
    };

    let (title, message, description) = match decision {
        RefundDecision::Approve => (
            "Refund completed",
            format!(
                "Your refund {} has been completed, amount {}",
                refund.refund_number, refund.amount
            ),
            format!("Approved refund {}", refund.refund_number),
        ),
        RefundDecision::Reject => (
            "Refund rejected",
            format!("Your refund request {} has been rejected", refund.refund_number),
            format!("Rejected refund {}", refund.refund_number),
        ),
    };
    notify(&txn, buyer_id, NotificationKind::Payment, title, message).await?;

    txn.commit().await?;

    tracing::info!(
        refund_number = %refund.refund_number,
        decision = ?decision,
        admin_id = %ctx.user_id(),
        "refund decided"
    );

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(LogAction::Update, "Refund", refund.id, description),
    )
    .await;

    Ok(ApiResponse::item(
        "Refund processed",
        RefundDecisionResult {
            refund: Refund::from(refund),
            order: Order::from(order),
        },
    ))
}
