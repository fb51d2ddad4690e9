use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::{SystemLogEntry, record_system_log},
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::{
        Users,
        enums::LogAction,
        users::{ActiveModel as UserActive, Column as UserCol},
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::{AuthUser, ROLE_USER, RequestContext},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("A valid email is required"));
    }
    ensure_max_len("Email", &email, 255)?;
    if payload.password.len() < 8 {
        return Err(AppError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::bad_request("Email is already taken"));
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        role: Set(ROLE_USER.to_string()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::success("User created", User::from(user), None))
}

pub async fn login_user(
    state: &AppState,
    ip_address: Option<String>,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::bad_request("Invalid email or password")),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::bad_request("Invalid email or password"));
    }

    let settings = &state.auth;
    let issued_at = Utc::now();
    let expires_at = issued_at + settings.token_ttl;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        iat: issued_at.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let ctx = RequestContext::new(
        AuthUser {
            user_id: user.id,
            role: user.role.clone(),
        },
        ip_address,
    );
    let entry = SystemLogEntry::new(LogAction::Login, "User", user.id, "User logged in");
    if let Err(err) = record_system_log(&state.pool, &ctx, &entry).await {
        tracing::warn!(error = %err, "login log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: settings.token_ttl.num_seconds(),
            user: User::from(user),
        },
        Some(Meta::empty()),
    ))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    match Users::find_by_id(user.user_id).one(&state.orm).await? {
        Some(u) => Ok(ApiResponse::item("OK", User::from(u))),
        None => Err(AppError::Unauthorized("Account no longer exists".into())),
    }
}
