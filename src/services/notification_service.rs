use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::notifications::{MarkReadResult, NotificationList},
    entity::{
        enums::NotificationKind,
        notifications::{ActiveModel as NotificationActive, Column as NotificationCol},
        Notifications,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Stores one notification for `user_id`. Takes any connection so callers can
/// write it inside their own transaction.
pub async fn notify<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    kind: NotificationKind,
    title: impl Into<String>,
    message: impl Into<String>,
) -> Result<(), DbErr> {
    NotificationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        kind: Set(kind),
        title: Set(title.into()),
        message: Set(message.into()),
        is_read: Set(false),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<NotificationList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Notifications::find()
        .filter(NotificationCol::UserId.eq(user.user_id))
        .order_by_desc(NotificationCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await?;
    let unread_count = Notifications::find()
        .filter(
            Condition::all()
                .add(NotificationCol::UserId.eq(user.user_id))
                .add(NotificationCol::IsRead.eq(false)),
        )
        .count(&state.orm)
        .await?;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Notification::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        NotificationList {
            items,
            unread_count,
        },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<MarkReadResult>> {
    let notification = Notifications::find()
        .filter(
            Condition::all()
                .add(NotificationCol::Id.eq(id))
                .add(NotificationCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;
    let notification = match notification {
        Some(n) => n,
        None => return Err(AppError::NotFound),
    };

    if !notification.is_read {
        let mut active: NotificationActive = notification.into();
        active.is_read = Set(true);
        active.update(&state.orm).await?;
    }

    Ok(ApiResponse::item(
        "Notification marked as read",
        MarkReadResult { success: true },
    ))
}
