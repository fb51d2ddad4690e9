use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Notification;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    pub unread_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkReadResult {
    pub success: bool,
}
