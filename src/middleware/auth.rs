use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{config::AuthSettings, dto::auth::Claims, error::AppError, state::AppState};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Everything an operation needs to know about the caller: who they are and
/// where the request came from.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: AuthUser,
    pub ip_address: Option<String>,
}

impl RequestContext {
    pub fn new(user: AuthUser, ip_address: Option<String>) -> Self {
        Self { user, ip_address }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.user_id
    }
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_ADMIN)
}

fn decode_bearer(parts: &Parts, settings: &AuthSettings) -> Result<AuthUser, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
        .trim();

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

fn client_ip(parts: &Parts) -> Option<String> {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    forwarded.or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        decode_bearer(parts, &app.auth)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        let app = AppState::from_ref(state);
        decode_bearer(parts, &app.auth).map(Some)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let user = decode_bearer(parts, &app.auth)?;
        Ok(RequestContext::new(user, client_ip(parts)))
    }
}

/// Client address for unauthenticated routes that still want to audit.
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip(parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn settings() -> AuthSettings {
        AuthSettings::new("unit-test-secret", Duration::hours(1))
    }

    fn parts_with(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/cart");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn token(secret: &str, user_id: Uuid, role: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn bearer_token_signed_with_configured_secret_is_accepted() {
        let user_id = Uuid::new_v4();
        let header = format!("Bearer {}", token("unit-test-secret", user_id, ROLE_ADMIN));

        let user = decode_bearer(&parts_with(Some(&header)), &settings()).unwrap();
        assert_eq!(user.user_id, user_id);
        assert!(user.is_admin());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let header = format!("Bearer {}", token("other-secret", Uuid::new_v4(), ROLE_USER));

        let err = decode_bearer(&parts_with(Some(&header)), &settings()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        let err = decode_bearer(&parts_with(None), &settings()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Missing Authorization header"));

        let err = decode_bearer(&parts_with(Some("Basic abc")), &settings()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid Authorization scheme"));
    }

    #[test]
    fn forwarded_address_wins_over_socket() {
        let mut parts = parts_with(None);
        parts
            .headers
            .insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&parts).as_deref(), Some("203.0.113.9"));
    }
}
