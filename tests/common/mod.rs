#![allow(dead_code)]

use chrono::{Duration, Utc};
use fomo_commerce_api::{
    config::AuthSettings,
    db::{create_orm_conn, run_migrations},
    entity::{
        coupons::ActiveModel as CouponActive,
        enums::{DiscountType, ProductStatus},
        PaymentMethods,
        payment_methods::{ActiveModel as MethodActive, Column as MethodCol},
        products::{ActiveModel as ProductActive, Model as ProductModel},
        users::ActiveModel as UserActive,
    },
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_USER, RequestContext},
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, sea_query::OnConflict};
use tokio::sync::OnceCell;
use uuid::Uuid;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connects to the test database, or returns `None` when none is configured.
///
/// Tests never truncate: every fixture gets unique names so runs can share a
/// database.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests.");
            return Ok(None);
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    MIGRATED
        .get_or_try_init(|| async { run_migrations(&orm).await.map(|_| ()) })
        .await?;

    let auth = AuthSettings::new("integration-test-secret", Duration::hours(1));
    Ok(Some(AppState::new(orm, auth)))
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn create_account(state: &AppState, role: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", unique(role))),
        password_hash: Set("not-a-real-hash".into()),
        role: Set(role.into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn create_user(state: &AppState) -> anyhow::Result<AuthUser> {
    create_account(state, ROLE_USER).await
}

pub async fn create_admin(state: &AppState) -> anyhow::Result<RequestContext> {
    let admin = create_account(state, ROLE_ADMIN).await?;
    Ok(RequestContext::new(admin, Some("127.0.0.1".into())))
}

pub async fn create_product(
    state: &AppState,
    price: Decimal,
    stock: i32,
) -> anyhow::Result<ProductModel> {
    let now = Utc::now();
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(unique("Product")),
        description: Set("Fixture product".into()),
        category_id: Set(None),
        price: Set(price),
        stock: Set(stock),
        status: Set(ProductStatus::Active),
        view_count: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(product)
}

/// Percentage coupon valid for the next day.
pub async fn create_percentage_coupon(
    state: &AppState,
    percent: i64,
    min_purchase: Decimal,
) -> anyhow::Result<String> {
    create_coupon_with(state, percent, min_purchase, None, None).await
}

/// Percentage coupon with an optional usage limit and discount cap.
pub async fn create_coupon_with(
    state: &AppState,
    percent: i64,
    min_purchase: Decimal,
    usage_limit: Option<i32>,
    max_discount: Option<Decimal>,
) -> anyhow::Result<String> {
    let now = Utc::now();
    let code = unique("SAVE").to_uppercase()[..20].to_string();
    CouponActive {
        id: Set(Uuid::new_v4()),
        code: Set(code.clone()),
        description: Set(format!("{percent}% off")),
        discount_type: Set(DiscountType::Percentage),
        discount_value: Set(Decimal::from(percent)),
        min_purchase: Set(min_purchase),
        max_discount: Set(max_discount),
        valid_from: Set((now - Duration::hours(1)).into()),
        valid_until: Set((now + Duration::days(1)).into()),
        usage_limit: Set(usage_limit),
        used_count: Set(0),
        is_active: Set(true),
        created_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(code)
}

pub async fn create_payment_method(state: &AppState) -> anyhow::Result<Uuid> {
    let code = Uuid::new_v4().simple().to_string()[..16].to_string();
    let method = MethodActive {
        id: Set(Uuid::new_v4()),
        name: Set("Test Card".into()),
        code: Set(code),
        is_active: Set(true),
        description: Set(String::new()),
    }
    .insert(&state.orm)
    .await?;

    Ok(method.id)
}

/// Returns the id of the method with `code`, inserting it when the database
/// has not been seeded.
pub async fn ensure_payment_method(state: &AppState, code: &str) -> anyhow::Result<Uuid> {
    let method = MethodActive {
        id: Set(Uuid::new_v4()),
        name: Set(code.replace('_', " ")),
        code: Set(code.to_string()),
        is_active: Set(true),
        description: Set(String::new()),
    };
    PaymentMethods::insert(method)
        .on_conflict(OnConflict::column(MethodCol::Code).do_nothing().to_owned())
        .exec_without_returning(&state.orm)
        .await?;

    let method = PaymentMethods::find()
        .filter(MethodCol::Code.eq(code))
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("payment method {code} missing"))?;
    Ok(method.id)
}
