use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::support::{
        CreateTicketRequest, FaqList, TicketDetail, TicketList, TicketMessageRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Ticket, TicketMessage},
    response::ApiResponse,
    routes::params::{FaqQuery, TicketListQuery},
    services::{faq_service, ticket_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route("/tickets/{id}", get(get_ticket))
        .route("/tickets/{id}/messages", post(post_message))
        .route("/faqs", get(list_faqs))
}

#[utoipa::path(
    post,
    path = "/api/support/tickets",
    request_body = CreateTicketRequest,
    responses((status = 200, description = "Ticket created", body = ApiResponse<Ticket>)),
    security(("bearer_auth" = [])),
    tag = "Support"
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTicketRequest>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::create_ticket(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/support/tickets",
    params(TicketListQuery),
    responses((status = 200, description = "Tickets of the current user", body = ApiResponse<TicketList>)),
    security(("bearer_auth" = [])),
    tag = "Support"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TicketListQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = ticket_service::list_tickets(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/support/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket id")),
    responses((status = 200, description = "Ticket with messages", body = ApiResponse<TicketDetail>)),
    security(("bearer_auth" = [])),
    tag = "Support"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TicketDetail>>> {
    let resp = ticket_service::get_ticket(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/support/tickets/{id}/messages",
    params(("id" = Uuid, Path, description = "Ticket id")),
    request_body = TicketMessageRequest,
    responses((status = 200, description = "Message sent", body = ApiResponse<TicketMessage>)),
    security(("bearer_auth" = [])),
    tag = "Support"
)]
pub async fn post_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketMessageRequest>,
) -> AppResult<Json<ApiResponse<TicketMessage>>> {
    let resp = ticket_service::post_message(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/support/faqs",
    params(FaqQuery),
    responses((status = 200, description = "Active FAQs", body = ApiResponse<FaqList>)),
    tag = "Support"
)]
pub async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> AppResult<Json<ApiResponse<FaqList>>> {
    let resp = faq_service::list_faqs(&state, query).await?;
    Ok(Json(resp))
}
