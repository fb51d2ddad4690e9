use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

/// Fields left out keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}
