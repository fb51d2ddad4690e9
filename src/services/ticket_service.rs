use chrono::Utc;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{SystemLogEntry, log_admin_action},
    dto::support::{
        CreateTicketRequest, TicketAction, TicketActionRequest, TicketDetail, TicketList,
        TicketMessageRequest,
    },
    entity::{
        Orders, TicketMessages, Tickets,
        enums::{LogAction, NotificationKind, TicketPriority, TicketStatus},
        orders::Column as OrderCol,
        ticket_messages::{ActiveModel as MessageActive, Column as MessageCol},
        tickets::{ActiveModel as TicketActive, Column as TicketCol, Model as TicketModel},
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::{AuthUser, RequestContext, ensure_admin},
    models::{Ticket, TicketMessage},
    response::{ApiResponse, Meta},
    routes::params::TicketListQuery,
    services::notification_service::notify,
    state::AppState,
};

pub async fn create_ticket(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTicketRequest,
) -> AppResult<ApiResponse<Ticket>> {
    let subject = payload.subject.trim();
    let description = payload.description.trim();
    if subject.is_empty() || description.is_empty() {
        return Err(AppError::bad_request("Subject and description are required"));
    }
    ensure_max_len("Subject", subject, 200)?;

    if let Some(order_id) = payload.order_id {
        let owned = Orders::find()
            .filter(
                Condition::all()
                    .add(OrderCol::Id.eq(order_id))
                    .add(OrderCol::UserId.eq(user.user_id)),
            )
            .count(&state.orm)
            .await?;
        if owned == 0 {
            return Err(AppError::bad_request("Related order not found"));
        }
    }

    let txn = state.orm.begin().await?;
    let ticket = TicketActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        subject: Set(subject.to_string()),
        description: Set(description.to_string()),
        status: Set(TicketStatus::Open),
        priority: Set(payload.priority.unwrap_or(TicketPriority::Medium)),
        assigned_to: Set(None),
        related_order_id: Set(payload.order_id),
        resolved_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    notify(
        &txn,
        user.user_id,
        NotificationKind::System,
        "Support ticket created",
        format!(
            "Your support ticket #{} has been created. We will get back to you soon.",
            ticket.id
        ),
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::item("Ticket created", Ticket::from(ticket)))
}

async fn list_with(
    state: &AppState,
    owner: Option<Uuid>,
    query: TicketListQuery,
) -> AppResult<ApiResponse<TicketList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(user_id) = owner {
        condition = condition.add(TicketCol::UserId.eq(user_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(TicketCol::Status.eq(status));
    }
    if let Some(priority) = query.priority {
        condition = condition.add(TicketCol::Priority.eq(priority));
    }

    let finder = Tickets::find()
        .filter(condition)
        .order_by_desc(TicketCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ticket::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        TicketList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn list_tickets(
    state: &AppState,
    user: &AuthUser,
    query: TicketListQuery,
) -> AppResult<ApiResponse<TicketList>> {
    list_with(state, Some(user.user_id), query).await
}

pub async fn list_all_tickets(
    state: &AppState,
    user: &AuthUser,
    query: TicketListQuery,
) -> AppResult<ApiResponse<TicketList>> {
    ensure_admin(user)?;
    list_with(state, None, query).await
}

async fn find_ticket(state: &AppState, id: Uuid, owner: Option<Uuid>) -> AppResult<TicketModel> {
    let mut condition = Condition::all().add(TicketCol::Id.eq(id));
    if let Some(user_id) = owner {
        condition = condition.add(TicketCol::UserId.eq(user_id));
    }
    match Tickets::find().filter(condition).one(&state.orm).await? {
        Some(t) => Ok(t),
        None => Err(AppError::NotFound),
    }
}

async fn detail(state: &AppState, ticket: TicketModel) -> AppResult<TicketDetail> {
    let messages = TicketMessages::find()
        .filter(MessageCol::TicketId.eq(ticket.id))
        .order_by_asc(MessageCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(TicketMessage::from)
        .collect();
    Ok(TicketDetail {
        ticket: Ticket::from(ticket),
        messages,
    })
}

pub async fn get_ticket(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<TicketDetail>> {
    let ticket = find_ticket(state, id, Some(user.user_id)).await?;
    Ok(ApiResponse::item("OK", detail(state, ticket).await?))
}

pub async fn get_ticket_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<TicketDetail>> {
    ensure_admin(user)?;
    let ticket = find_ticket(state, id, None).await?;
    Ok(ApiResponse::item("OK", detail(state, ticket).await?))
}

/// Customer reply on their own ticket.
pub async fn post_message(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: TicketMessageRequest,
) -> AppResult<ApiResponse<TicketMessage>> {
    let text = payload.message.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("Message is required"));
    }
    let ticket = find_ticket(state, id, Some(user.user_id)).await?;

    let txn = state.orm.begin().await?;
    let message = MessageActive {
        id: Set(Uuid::new_v4()),
        ticket_id: Set(ticket.id),
        user_id: Set(user.user_id),
        message: Set(text.to_string()),
        is_from_staff: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut active: TicketActive = ticket.into();
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::item("Message sent", TicketMessage::from(message)))
}

/// Staff action on a ticket: reply, take ownership, resolve or close.
pub async fn act_on_ticket(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
    payload: TicketActionRequest,
) -> AppResult<ApiResponse<TicketDetail>> {
    ensure_admin(&ctx.user)?;
    let ticket = find_ticket(state, id, None).await?;
    let now = Utc::now();

    let reply = payload
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    if payload.action == TicketAction::Reply && reply.is_none() {
        return Err(AppError::bad_request("Reply message is required"));
    }

    let txn = state.orm.begin().await?;
    let was_open = ticket.status == TicketStatus::Open;
    let mut active: TicketActive = ticket.into();
    match payload.action {
        TicketAction::Reply => {
            if let Some(text) = reply {
                MessageActive {
                    id: Set(Uuid::new_v4()),
                    ticket_id: Set(id),
                    user_id: Set(ctx.user_id()),
                    message: Set(text),
                    is_from_staff: Set(true),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
            if was_open {
                active.status = Set(TicketStatus::InProgress);
                active.assigned_to = Set(Some(ctx.user_id()));
            }
        }
        TicketAction::Assign => {
            active.status = Set(TicketStatus::InProgress);
            active.assigned_to = Set(Some(ctx.user_id()));
        }
        TicketAction::Resolve => {
            active.status = Set(TicketStatus::Resolved);
            active.resolved_at = Set(Some(now.into()));
        }
        TicketAction::Close => {
            active.status = Set(TicketStatus::Closed);
        }
    }
    active.updated_at = Set(now.into());
    let ticket = active.update(&txn).await?;
    txn.commit().await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Update,
            "CustomerServiceTicket",
            ticket.id,
            format!("Ticket status is now {}", ticket.status.to_value()),
        ),
    )
    .await;

    Ok(ApiResponse::item("Ticket updated", detail(state, ticket).await?))
}
