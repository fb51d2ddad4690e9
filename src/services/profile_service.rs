use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    dto::profile::UpdateProfileRequest,
    entity::{
        CustomerProfiles,
        customer_profiles::{ActiveModel as ProfileActive, Column as ProfileCol, Model as ProfileModel},
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::AuthUser,
    models::CustomerProfile,
    response::ApiResponse,
    state::AppState,
};

/// Loads the user's profile, creating an empty one on first use.
pub(crate) async fn find_or_create<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<ProfileModel, DbErr> {
    let blank = ProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        phone: Set(String::new()),
        address: Set(String::new()),
        birth_date: Set(None),
        ..Default::default()
    };
    CustomerProfiles::insert(blank)
        .on_conflict(OnConflict::column(ProfileCol::UserId).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;

    CustomerProfiles::find()
        .filter(ProfileCol::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("customer profile of {user_id}")))
}

pub async fn get_profile(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let profile = find_or_create(&state.orm, user.user_id).await?;
    Ok(ApiResponse::item("OK", CustomerProfile::from(profile)))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let phone = payload.phone.as_deref().map(str::trim);
    if let Some(phone) = phone {
        ensure_max_len("Phone", phone, 20)?;
    }
    if payload
        .birth_date
        .is_some_and(|date| date > Utc::now().date_naive())
    {
        return Err(AppError::bad_request("Birth date cannot be in the future"));
    }

    let profile = find_or_create(&state.orm, user.user_id).await?;
    let mut active: ProfileActive = profile.into();
    if let Some(phone) = phone {
        active.phone = Set(phone.to_string());
    }
    if let Some(address) = payload.address {
        active.address = Set(address.trim().to_string());
    }
    if let Some(birth_date) = payload.birth_date {
        active.birth_date = Set(Some(birth_date));
    }
    active.updated_at = Set(Utc::now().into());
    let profile = active.update(&state.orm).await?;

    tracing::debug!(user_id = %user.user_id, "profile updated");
    Ok(ApiResponse::item("Profile updated", CustomerProfile::from(profile)))
}
