mod common;

use chrono::{Duration, NaiveDate, Utc};
use fomo_commerce_api::{
    dto::{
        cart::AddToCartRequest,
        payments::{AccountDetails, AddPaymentAccountRequest},
        profile::UpdateProfileRequest,
    },
    error::AppError,
    services::{cart_service, order_service, payment_account_service, profile_service},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use common::*;

fn card(method_id: Uuid, name: &str, number: &str, is_default: bool) -> AddPaymentAccountRequest {
    AddPaymentAccountRequest {
        payment_method_id: method_id,
        account_name: name.to_string(),
        details: AccountDetails {
            card_number: Some(number.to_string()),
            card_holder: Some("Test Holder".into()),
            expiry_date: Some("09/30".into()),
            ..Default::default()
        },
        is_default,
    }
}

#[tokio::test]
async fn profile_is_created_on_first_read_and_feeds_checkout() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;

    let blank = profile_service::get_profile(&state, &user)
        .await?
        .data
        .expect("profile");
    assert_eq!(blank.user_id, user.user_id);
    assert!(blank.phone.is_empty());
    assert!(blank.birth_date.is_none());

    let birthday = NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid date");
    let updated = profile_service::update_profile(
        &state,
        &user,
        UpdateProfileRequest {
            phone: Some(" 555-0142 ".into()),
            address: Some("9 Borrow Lane".into()),
            birth_date: Some(birthday),
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(updated.phone, "555-0142");
    assert_eq!(updated.birth_date, Some(birthday));

    // Omitted fields keep their value.
    let kept = profile_service::update_profile(
        &state,
        &user,
        UpdateProfileRequest {
            address: Some("10 Borrow Lane".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(kept.phone, "555-0142");
    assert_eq!(kept.address, "10 Borrow Lane");

    let err = profile_service::update_profile(
        &state,
        &user,
        UpdateProfileRequest {
            phone: Some("0".repeat(21)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = profile_service::update_profile(
        &state,
        &user,
        UpdateProfileRequest {
            birth_date: Some(Utc::now().date_naive() + Duration::days(2)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Birth date cannot be in the future"));

    let err = order_service::checkout_preview(&state, &user).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Cart is empty"));

    let product = create_product(&state, Decimal::from(14), 3).await?;
    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?;
    let preview = order_service::checkout_preview(&state, &user)
        .await?
        .data
        .expect("preview");
    assert_eq!(preview.items.len(), 1);
    assert_eq!(preview.total, Decimal::from(28));
    assert_eq!(preview.shipping_address, "10 Borrow Lane");
    assert_eq!(preview.shipping_phone, "555-0142");

    Ok(())
}

#[tokio::test]
async fn only_one_saved_account_is_default() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let card_method = ensure_payment_method(&state, "credit_card").await?;
    let bank_method = ensure_payment_method(&state, "bank_transfer").await?;

    let first = payment_account_service::add_account(
        &state,
        &user,
        card(card_method, "Everyday card", "4111 1111 1111 4242", true),
    )
    .await?
    .data
    .expect("account");
    assert!(first.is_default);
    assert_eq!(first.account_info["card_number"], "**** 4242");

    let second = payment_account_service::add_account(
        &state,
        &user,
        AddPaymentAccountRequest {
            payment_method_id: bank_method,
            account_name: "Savings".into(),
            details: AccountDetails {
                bank_name: Some("First Bank".into()),
                account_number: Some("0012345678".into()),
                account_holder: Some("Test Holder".into()),
                ..Default::default()
            },
            is_default: true,
        },
    )
    .await?
    .data
    .expect("account");
    assert_eq!(second.account_info["account_number"], "**** 5678");

    let listed = payment_account_service::list_accounts(&state, &user)
        .await?
        .data
        .expect("accounts");
    assert_eq!(listed.items.len(), 2);
    assert_eq!(listed.items[0].id, second.id);
    assert!(listed.items[0].is_default);
    assert!(!listed.items[1].is_default);

    let switched = payment_account_service::set_default_account(&state, &user, first.id)
        .await?
        .data
        .expect("account");
    assert!(switched.is_default);
    let listed = payment_account_service::list_accounts(&state, &user)
        .await?
        .data
        .expect("accounts");
    assert_eq!(listed.items.iter().filter(|a| a.is_default).count(), 1);
    assert_eq!(listed.items[0].id, first.id);

    Ok(())
}

#[tokio::test]
async fn saved_accounts_are_private_and_validated() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let owner = create_user(&state).await?;
    let stranger = create_user(&state).await?;
    let card_method = ensure_payment_method(&state, "credit_card").await?;

    let err = payment_account_service::add_account(
        &state,
        &owner,
        card(Uuid::new_v4(), "Ghost", "4000", false),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = payment_account_service::add_account(
        &state,
        &owner,
        card(card_method, "   ", "4000", false),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Account name is required"));

    let mut no_number = card(card_method, "No number", "", false);
    no_number.details.card_number = None;
    let err = payment_account_service::add_account(&state, &owner, no_number)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Card number is required"));

    let account = payment_account_service::add_account(
        &state,
        &owner,
        card(card_method, "Travel card", "5500 0000 0000 0004", false),
    )
    .await?
    .data
    .expect("account");
    assert!(!account.is_default);

    let err = payment_account_service::set_default_account(&state, &stranger, account.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let err = payment_account_service::delete_account(&state, &stranger, account.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let deleted = payment_account_service::delete_account(&state, &owner, account.id)
        .await?
        .data
        .expect("deleted");
    assert_eq!(deleted.id, account.id);
    let listed = payment_account_service::list_accounts(&state, &owner)
        .await?
        .data
        .expect("accounts");
    assert!(listed.items.is_empty());

    Ok(())
}
