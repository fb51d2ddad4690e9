use uuid::Uuid;

use crate::{
    db::DbPool, entity::enums::LogAction, error::AppResult, middleware::auth::RequestContext,
};

/// One row of the administrator audit trail.
#[derive(Debug, Clone)]
pub struct SystemLogEntry<'a> {
    pub action: LogAction,
    pub model_name: &'a str,
    pub object_id: String,
    pub description: String,
}

impl<'a> SystemLogEntry<'a> {
    pub fn new(
        action: LogAction,
        model_name: &'a str,
        object_id: impl ToString,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action,
            model_name,
            object_id: object_id.to_string(),
            description: description.into(),
        }
    }
}

pub async fn record_system_log(
    pool: &DbPool,
    ctx: &RequestContext,
    entry: &SystemLogEntry<'_>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO system_logs (id, user_id, action, model_name, object_id, description, ip_address)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(ctx.user_id())
    .bind(entry.action.as_str())
    .bind(entry.model_name)
    .bind(&entry.object_id)
    .bind(&entry.description)
    .bind(ctx.ip_address.as_deref())
    .execute(pool)
    .await?;

    Ok(())
}

/// Best-effort audit write: the admin mutation has already committed, so a
/// failure here is only reported.
pub async fn log_admin_action(pool: &DbPool, ctx: &RequestContext, entry: SystemLogEntry<'_>) {
    if let Err(err) = record_system_log(pool, ctx, &entry).await {
        tracing::warn!(
            error = %err,
            action = entry.action.as_str(),
            model = entry.model_name,
            object_id = %entry.object_id,
            "system log write failed"
        );
    }
}
