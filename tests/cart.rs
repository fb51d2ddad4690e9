mod common;

use fomo_commerce_api::{
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    error::AppError,
    services::cart_service,
};
use rust_decimal::Decimal;

use common::*;

#[tokio::test]
async fn repeat_add_is_clamped_to_stock() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(3), 4).await?;
    let add = |quantity| AddToCartRequest {
        product_id: product.id,
        quantity,
    };

    let first = cart_service::add_to_cart(&state, &user, add(3)).await?.data.expect("line");
    assert_eq!(first.quantity, 3);

    let second = cart_service::add_to_cart(&state, &user, add(3)).await?.data.expect("line");
    assert_eq!(second.id, first.id);
    assert_eq!(second.quantity, 4);

    let err = cart_service::add_to_cart(&state, &user, add(5)).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Insufficient stock"));

    Ok(())
}

#[tokio::test]
async fn repeat_add_near_integer_limit_does_not_overflow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::ONE, i32::MAX).await?;
    let add = |quantity| AddToCartRequest {
        product_id: product.id,
        quantity,
    };

    cart_service::add_to_cart(&state, &user, add(i32::MAX)).await?;
    let line = cart_service::add_to_cart(&state, &user, add(5))
        .await?
        .data
        .expect("line");
    assert_eq!(line.quantity, i32::MAX);

    Ok(())
}

#[tokio::test]
async fn lines_are_scoped_to_their_owner() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let owner = create_user(&state).await?;
    let stranger = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(12), 10).await?;

    let line = cart_service::add_to_cart(
        &state,
        &owner,
        AddToCartRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?
    .data
    .expect("line");

    let err = cart_service::update_cart_item(
        &state,
        &stranger,
        line.id,
        UpdateCartItemRequest { quantity: 1 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = cart_service::remove_from_cart(&state, &stranger, line.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let cart = cart_service::update_cart_item(
        &state,
        &owner,
        line.id,
        UpdateCartItemRequest { quantity: 0 },
    )
    .await?
    .data
    .expect("cart");
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, Decimal::ZERO);

    Ok(())
}
