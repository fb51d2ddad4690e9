use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{SystemLogEntry, log_admin_action},
    dto::support::{FaqList, FaqRequest},
    entity::{
        Faqs,
        enums::LogAction,
        faqs::{ActiveModel as FaqActive, Column as FaqCol},
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::{AuthUser, RequestContext, ensure_admin},
    models::Faq,
    response::{ApiResponse, IdResponse, Meta},
    routes::params::FaqQuery,
    state::AppState,
};

async fn list_with(
    state: &AppState,
    active_only: bool,
    query: FaqQuery,
) -> AppResult<ApiResponse<FaqList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if active_only {
        condition = condition.add(FaqCol::IsActive.eq(true));
    }
    if let Some(category) = query.category {
        condition = condition.add(FaqCol::Category.eq(category));
    }

    let finder = Faqs::find()
        .filter(condition)
        .order_by_asc(FaqCol::SortOrder)
        .order_by_desc(FaqCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Faq::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        FaqList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn list_faqs(state: &AppState, query: FaqQuery) -> AppResult<ApiResponse<FaqList>> {
    list_with(state, true, query).await
}

pub async fn list_faqs_admin(
    state: &AppState,
    user: &AuthUser,
    query: FaqQuery,
) -> AppResult<ApiResponse<FaqList>> {
    ensure_admin(user)?;
    list_with(state, false, query).await
}

fn validated(payload: &FaqRequest) -> AppResult<(String, String)> {
    let question = payload.question.trim();
    let answer = payload.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(AppError::bad_request("Question and answer are required"));
    }
    ensure_max_len("Question", question, 200)?;
    Ok((question.to_string(), answer.to_string()))
}

pub async fn create_faq(
    state: &AppState,
    ctx: &RequestContext,
    payload: FaqRequest,
) -> AppResult<ApiResponse<Faq>> {
    ensure_admin(&ctx.user)?;
    let (question, answer) = validated(&payload)?;

    let faq = FaqActive {
        id: Set(Uuid::new_v4()),
        category: Set(payload.category),
        question: Set(question),
        answer: Set(answer),
        sort_order: Set(payload.sort_order),
        is_active: Set(payload.is_active),
        view_count: Set(0),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Create,
            "FAQ",
            faq.id,
            format!("Created FAQ: {}", faq.question),
        ),
    )
    .await;

    Ok(ApiResponse::item("FAQ created", Faq::from(faq)))
}

pub async fn update_faq(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
    payload: FaqRequest,
) -> AppResult<ApiResponse<Faq>> {
    ensure_admin(&ctx.user)?;
    let (question, answer) = validated(&payload)?;

    let faq = match Faqs::find_by_id(id).one(&state.orm).await? {
        Some(f) => f,
        None => return Err(AppError::NotFound),
    };

    let mut active: FaqActive = faq.into();
    active.category = Set(payload.category);
    active.question = Set(question);
    active.answer = Set(answer);
    active.sort_order = Set(payload.sort_order);
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(Utc::now().into());
    let faq = active.update(&state.orm).await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Update,
            "FAQ",
            faq.id,
            format!("Updated FAQ: {}", faq.question),
        ),
    )
    .await;

    Ok(ApiResponse::item("FAQ updated", Faq::from(faq)))
}

pub async fn delete_faq(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
) -> AppResult<ApiResponse<IdResponse>> {
    ensure_admin(&ctx.user)?;
    let faq = match Faqs::find_by_id(id).one(&state.orm).await? {
        Some(f) => f,
        None => return Err(AppError::NotFound),
    };
    Faqs::delete_by_id(faq.id).exec(&state.orm).await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Delete,
            "FAQ",
            faq.id,
            format!("Deleted FAQ: {}", faq.question),
        ),
    )
    .await;

    Ok(ApiResponse::item("FAQ deleted", IdResponse { id: faq.id }))
}
