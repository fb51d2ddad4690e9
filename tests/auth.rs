mod common;

use fomo_commerce_api::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    services::auth_service::{login_user, register_user},
};

#[tokio::test]
async fn register_then_login() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };
    let email = format!("{}@Example.com", common::unique("Shopper"));

    let user = register_user(
        &state,
        RegisterRequest {
            email: email.clone(),
            password: "hunter2hunter2".into(),
        },
    )
    .await?
    .data
    .expect("user");
    assert_eq!(user.email, email.to_lowercase());
    assert_eq!(user.role, "user");

    let taken = register_user(
        &state,
        RegisterRequest {
            email: email.to_uppercase(),
            password: "hunter2hunter2".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(taken, AppError::BadRequest(_)));

    let short = register_user(
        &state,
        RegisterRequest {
            email: format!("{}@example.com", common::unique("short")),
            password: "short".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(short, AppError::BadRequest(_)));

    let wrong = login_user(
        &state,
        None,
        LoginRequest {
            email: email.clone(),
            password: "not-the-password".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(wrong, AppError::BadRequest(_)));

    let login = login_user(
        &state,
        Some("10.0.0.1".into()),
        LoginRequest {
            email,
            password: "hunter2hunter2".into(),
        },
    )
    .await?
    .data
    .expect("login");
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.user.id, user.id);
    assert_eq!(login.expires_in, 3600);
    assert_eq!(login.access_token.split('.').count(), 3);

    Ok(())
}
