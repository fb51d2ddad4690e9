mod common;

use fomo_commerce_api::{
    dto::{
        admin::{AnswerQuestionRequest, UpdateOrderStatusRequest},
        cart::AddToCartRequest,
        catalog::{AskQuestionRequest, ReviewRequest},
        orders::CheckoutRequest,
        support::{CreateTicketRequest, TicketAction, TicketActionRequest, TicketMessageRequest},
    },
    entity::enums::{OrderStatus, TicketPriority, TicketStatus},
    error::AppError,
    middleware::auth::{AuthUser, RequestContext},
    services::{
        admin_service, cart_service, favorite_service, order_service, product_service,
        ticket_service,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use common::*;

async fn place_order(state: &AppState, user: &AuthUser, product_id: Uuid) -> anyhow::Result<Uuid> {
    cart_service::add_to_cart(
        state,
        user,
        AddToCartRequest {
            product_id,
            quantity: 1,
        },
    )
    .await?;
    let order = order_service::checkout(
        state,
        user,
        CheckoutRequest {
            shipping_address: "2 Crab Lane".into(),
            shipping_phone: "555-0101".into(),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("checkout data")
    .order;
    Ok(order.id)
}

#[tokio::test]
async fn only_buyers_of_a_delivered_order_can_review() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let buyer = create_user(&state).await?;
    let stranger = create_user(&state).await?;
    let admin = create_admin(&state).await?;
    let product = create_product(&state, Decimal::from(30), 10).await?;

    let order_id = place_order(&state, &buyer, product.id).await?;

    // Pending orders do not count as purchases.
    let review = || ReviewRequest {
        rating: 4,
        comment: "Solid".into(),
    };
    let err = product_service::add_review(&state, &buyer, product.id, review())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    admin_service::update_order_status(
        &state,
        &admin,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Delivered,
        },
    )
    .await?;

    let added = product_service::add_review(&state, &buyer, product.id, review()).await?;
    assert_eq!(added.message, "Review added");

    let replaced = product_service::add_review(
        &state,
        &buyer,
        product.id,
        ReviewRequest {
            rating: 2,
            comment: "Broke after a week".into(),
        },
    )
    .await?;
    assert_eq!(replaced.message, "Review updated");

    let err = product_service::add_review(&state, &stranger, product.id, review())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let out_of_range = product_service::add_review(
        &state,
        &buyer,
        product.id,
        ReviewRequest {
            rating: 6,
            comment: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(out_of_range, AppError::BadRequest(_)));

    let detail = product_service::get_product(&state, None, product.id)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.reviews.len(), 1);
    assert!((detail.average_rating - 2.0).abs() < f64::EPSILON);
    assert_eq!(detail.product.view_count, 1);

    Ok(())
}

#[tokio::test]
async fn favorite_toggles_and_shows_on_detail() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let product = create_product(&state, Decimal::from(12), 3).await?;

    let on = favorite_service::toggle_favorite(&state, &user, product.id)
        .await?
        .data
        .expect("toggle");
    assert!(on.is_favorited);

    let detail = product_service::get_product(&state, Some(&user), product.id)
        .await?
        .data
        .expect("detail");
    assert!(detail.is_favorited);

    let off = favorite_service::toggle_favorite(&state, &user, product.id)
        .await?
        .data
        .expect("toggle");
    assert!(!off.is_favorited);

    let missing = favorite_service::toggle_favorite(&state, &user, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn question_is_answered_by_staff() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let admin = create_admin(&state).await?;
    let product = create_product(&state, Decimal::from(12), 3).await?;

    let question = product_service::ask_question(
        &state,
        &user,
        product.id,
        AskQuestionRequest {
            question: "Is it waterproof?".into(),
        },
    )
    .await?
    .data
    .expect("question");
    assert!(question.answer.is_none());

    let forbidden = admin_service::answer_question(
        &state,
        &RequestContext::new(user.clone(), None),
        question.id,
        AnswerQuestionRequest {
            answer: "Yes".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(forbidden, AppError::Forbidden));

    let answered = admin_service::answer_question(
        &state,
        &admin,
        question.id,
        AnswerQuestionRequest {
            answer: "Yes, rated IP67.".into(),
        },
    )
    .await?
    .data
    .expect("answer");
    assert_eq!(answered.answer.as_deref(), Some("Yes, rated IP67."));
    assert_eq!(answered.answered_by, Some(admin.user_id()));
    assert!(answered.answered_at.is_some());

    Ok(())
}

#[tokio::test]
async fn ticket_moves_through_support_lifecycle() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let other = create_user(&state).await?;
    let admin = create_admin(&state).await?;
    let product = create_product(&state, Decimal::from(20), 5).await?;
    let order_id = place_order(&state, &user, product.id).await?;

    // Someone else's order cannot be attached.
    let err = ticket_service::create_ticket(
        &state,
        &other,
        CreateTicketRequest {
            subject: "Where is it?".into(),
            description: "Not mine".into(),
            priority: None,
            order_id: Some(order_id),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = ticket_service::create_ticket(
        &state,
        &user,
        CreateTicketRequest {
            subject: "x".repeat(250),
            description: "Subject does not fit".into(),
            priority: None,
            order_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Subject must be at most 200 characters"));

    let ticket = ticket_service::create_ticket(
        &state,
        &user,
        CreateTicketRequest {
            subject: "Where is my order?".into(),
            description: "Ordered two days ago".into(),
            priority: Some(TicketPriority::High),
            order_id: Some(order_id),
        },
    )
    .await?
    .data
    .expect("ticket");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.related_order_id, Some(order_id));

    let hidden = ticket_service::get_ticket(&state, &other, ticket.id)
        .await
        .unwrap_err();
    assert!(matches!(hidden, AppError::NotFound));

    let empty_reply = ticket_service::act_on_ticket(
        &state,
        &admin,
        ticket.id,
        TicketActionRequest {
            action: TicketAction::Reply,
            message: Some("   ".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(empty_reply, AppError::BadRequest(_)));

    let replied = ticket_service::act_on_ticket(
        &state,
        &admin,
        ticket.id,
        TicketActionRequest {
            action: TicketAction::Reply,
            message: Some("It ships tomorrow.".into()),
        },
    )
    .await?
    .data
    .expect("detail");
    assert_eq!(replied.ticket.status, TicketStatus::InProgress);
    assert_eq!(replied.ticket.assigned_to, Some(admin.user_id()));
    assert_eq!(replied.messages.len(), 1);
    assert!(replied.messages[0].is_from_staff);

    ticket_service::post_message(
        &state,
        &user,
        ticket.id,
        TicketMessageRequest {
            message: "Thanks!".into(),
        },
    )
    .await?;

    let resolved = ticket_service::act_on_ticket(
        &state,
        &admin,
        ticket.id,
        TicketActionRequest {
            action: TicketAction::Resolve,
            message: None,
        },
    )
    .await?
    .data
    .expect("detail");
    assert_eq!(resolved.ticket.status, TicketStatus::Resolved);
    assert!(resolved.ticket.resolved_at.is_some());
    assert_eq!(resolved.messages.len(), 2);
    assert!(!resolved.messages[1].is_from_staff);

    Ok(())
}
