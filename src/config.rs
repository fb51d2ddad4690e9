use std::{env, str::FromStr};

use chrono::Duration;

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    pub max_concurrent_requests: usize,
    pub auth: AuthSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        Ok(Self {
            database_url,
            host,
            port: parsed_or("APP_PORT", 3000),
            body_limit_bytes: parsed_or("BODY_LIMIT_BYTES", 1024 * 1024),
            max_concurrent_requests: parsed_or("MAX_CONCURRENT_REQUESTS", 100),
            // Fail at startup rather than on the first login.
            auth: AuthSettings::from_env()?,
        })
    }
}

/// Token signing settings, shared by the login handler and the bearer extractor.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let hours = parsed_or("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS).max(1);
        Ok(Self::new(jwt_secret, Duration::hours(hours)))
    }
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}
