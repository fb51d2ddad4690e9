use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    db,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let database = match db::ping(&state.pool).await {
        Ok(_) => "up".to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "health check database ping failed");
            "down".to_string()
        }
    };
    let status = if database == "up" { "ok" } else { "degraded" };

    Json(ApiResponse::success(
        "Health check",
        HealthData {
            status: status.to_string(),
            database,
        },
        Some(Meta::empty()),
    ))
}
