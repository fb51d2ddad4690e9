use chrono::{Duration, Utc};
use fomo_commerce_api::{
    config::AppConfig,
    db::{DbPool, create_orm_conn, run_migrations},
    services::auth_service::hash_password,
    state::AppState,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let state = AppState::new(orm, config.auth);
    let pool = &state.pool;

    let admin_id = ensure_user(pool, "admin@example.com", "admin12345", "admin").await?;
    let user_id = ensure_user(pool, "user@example.com", "user12345", "user").await?;
    seed_payment_methods(pool).await?;
    seed_catalog(pool).await?;
    seed_coupons(pool).await?;
    seed_faqs(pool).await?;

    tracing::info!(%admin_id, %user_id, "seed completed");
    Ok(())
}

async fn ensure_user(pool: &DbPool, email: &str, password: &str, role: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    tracing::info!(email, role, "ensured user");
    Ok(row.0)
}

async fn seed_payment_methods(pool: &DbPool) -> anyhow::Result<()> {
    let methods = [
        ("Credit Card", "credit_card", "Visa, Mastercard and JCB"),
        ("Bank Transfer", "bank_transfer", "Direct transfer to our account"),
        ("Cash on Delivery", "cod", "Pay the courier on arrival"),
    ];

    for (name, code, description) in methods {
        sqlx::query(
            r#"
            INSERT INTO payment_methods (id, name, code, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(code)
        .bind(description)
        .execute(pool)
        .await?;
    }

    tracing::info!("seeded payment methods");
    Ok(())
}

async fn ensure_category(pool: &DbPool, name: &str, description: &str) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

async fn seed_catalog(pool: &DbPool) -> anyhow::Result<()> {
    let apparel = ensure_category(pool, "Apparel", "Clothes and accessories").await?;
    let home = ensure_category(pool, "Home", "Kitchen and living").await?;

    // (category, name, description, price in cents, stock)
    let products = [
        (apparel, "Limited Hoodie", "Drop-only hoodie, never restocked", 5_500, 50),
        (apparel, "Flash Sneakers", "Available while the sale lasts", 12_000, 8),
        (home, "Ferris Mug", "Coffee tastes better with Ferris", 1_200, 100),
        (home, "Countdown Clock", "Never miss a drop again", 2_500, 5),
    ];

    for (category_id, name, description, cents, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category_id, price, stock)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(category_id)
        .bind(Decimal::new(cents, 2))
        .bind(stock)
        .execute(pool)
        .await?;
    }

    tracing::info!("seeded catalog");
    Ok(())
}

async fn seed_coupons(pool: &DbPool) -> anyhow::Result<()> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO coupons (id, code, description, discount_type, discount_value, min_purchase, valid_from, valid_until)
        VALUES ($1, 'SAVE10', '10% off orders of 50 or more', 'percentage', $2, $3, $4, $5)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(Decimal::from(10))
    .bind(Decimal::from(50))
    .bind(now)
    .bind(now + Duration::days(365))
    .execute(pool)
    .await?;

    tracing::info!("seeded coupons");
    Ok(())
}

async fn seed_faqs(pool: &DbPool) -> anyhow::Result<()> {
    let faqs = [
        ("payment", "Which payment methods do you accept?", "Credit card, bank transfer and cash on delivery.", 1),
        ("refund", "How do I request a refund?", "Open the order and request a refund once it has been paid.", 2),
        ("order", "Can I change my shipping address?", "Contact support before the order ships.", 3),
    ];

    for (category, question, answer, sort_order) in faqs {
        sqlx::query(
            r#"
            INSERT INTO faqs (id, category, question, answer, sort_order)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (SELECT 1 FROM faqs WHERE question = $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category)
        .bind(question)
        .bind(answer)
        .bind(sort_order)
        .execute(pool)
        .await?;
    }

    tracing::info!("seeded faqs");
    Ok(())
}
