use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::payments::{PayOrderRequest, PaymentMethodList, PaymentResult, TransactionList},
    entity::{
        PaymentMethods, PaymentTransactions,
        enums::{NotificationKind, OrderStatus, TransactionStatus},
        orders::ActiveModel as OrderActive,
        payment_methods::Column as MethodCol,
        payment_transactions::{ActiveModel as TxnActive, Column as TxnCol},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, PaymentMethod, PaymentTransaction},
    pricing,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{notification_service::notify, order_service::lock_order},
    state::AppState,
};

pub async fn list_payment_methods(state: &AppState) -> AppResult<ApiResponse<PaymentMethodList>> {
    let items = PaymentMethods::find()
        .filter(MethodCol::IsActive.eq(true))
        .order_by_asc(MethodCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PaymentMethod::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        PaymentMethodList { items },
        Some(Meta::empty()),
    ))
}

/// Pays a pending order with the simulated gateway.
///
/// The order row stays locked until commit, so two concurrent payments for
/// the same order cannot both see it as pending.
pub async fn pay_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: PayOrderRequest,
) -> AppResult<ApiResponse<PaymentResult>> {
    let txn = state.orm.begin().await?;

    let order = lock_order(&txn, order_id, Some(user.user_id)).await?;
    if order.status != OrderStatus::Pending {
        return Err(AppError::bad_request("This order cannot be paid"));
    }

    let method = PaymentMethods::find()
        .filter(
            Condition::all()
                .add(MethodCol::Id.eq(payload.payment_method_id))
                .add(MethodCol::IsActive.eq(true)),
        )
        .one(&txn)
        .await?;
    let method = match method {
        Some(m) => m,
        None => return Err(AppError::bad_request("Payment method is not available")),
    };

    let now = Utc::now();
    let transaction = TxnActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        user_id: Set(user.user_id),
        payment_method_id: Set(Some(method.id)),
        transaction_number: Set(pricing::transaction_number(now)),
        amount: Set(order.total_amount),
        status: Set(TransactionStatus::Processing),
        response_data: Set(None),
        error_message: Set(None),
        completed_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // Simulated gateway: every charge is approved.
    let mut active: TxnActive = transaction.into();
    active.status = Set(TransactionStatus::Completed);
    active.response_data = Set(Some(json!({
        "gateway": "simulated",
        "approved": true,
        "method": method.code,
    })));
    active.completed_at = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    let transaction = active.update(&txn).await?;

    let order_number = order.order_number.clone();
    let mut order: OrderActive = order.into();
    order.status = Set(OrderStatus::Paid);
    order.updated_at = Set(now.into());
    let order = order.update(&txn).await?;

    notify(
        &txn,
        user.user_id,
        NotificationKind::Payment,
        "Payment successful",
        format!(
            "Payment for order {} succeeded, amount {}",
            order_number, order.total_amount
        ),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        transaction_number = %transaction.transaction_number,
        amount = %transaction.amount,
        "payment completed"
    );

    Ok(ApiResponse::item(
        "Payment successful",
        PaymentResult {
            order: Order::from(order),
            transaction: PaymentTransaction::from(transaction),
        },
    ))
}

pub async fn list_transactions(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<TransactionList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = PaymentTransactions::find()
        .filter(TxnCol::UserId.eq(user.user_id))
        .order_by_desc(TxnCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PaymentTransaction::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        TransactionList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn get_transaction(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentTransaction>> {
    let transaction = PaymentTransactions::find()
        .filter(
            Condition::all()
                .add(TxnCol::Id.eq(id))
                .add(TxnCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;

    match transaction {
        Some(t) => Ok(ApiResponse::item("OK", PaymentTransaction::from(t))),
        None => Err(AppError::NotFound),
    }
}
