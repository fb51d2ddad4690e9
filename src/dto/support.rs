use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::{FaqCategory, TicketPriority},
    models::{Faq, Ticket, TicketMessage},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub description: String,
    pub priority: Option<TicketPriority>,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Reply,
    Assign,
    Resolve,
    Close,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketActionRequest {
    pub action: TicketAction,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub messages: Vec<TicketMessage>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TicketList {
    #[schema(value_type = Vec<Ticket>)]
    pub items: Vec<Ticket>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FaqRequest {
    pub category: FaqCategory,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FaqList {
    #[schema(value_type = Vec<Faq>)]
    pub items: Vec<Faq>,
}
