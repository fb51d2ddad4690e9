use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType, extension::postgres::PgExpr};
use uuid::Uuid;

use crate::{
    audit::{SystemLogEntry, log_admin_action},
    dto::catalog::{
        AskQuestionRequest, CategoryList, CreateCategoryRequest, CreateProductRequest,
        PriceHistoryList, ProductDetail, ProductList, ProductUpdateResult, ReviewRequest,
        UpdateProductRequest,
    },
    entity::{
        Categories, OrderItems, ProductPriceHistory, ProductQuestions, ProductReviews, Products,
        categories::{ActiveModel as CategoryActive, Column as CategoryCol},
        enums::{LogAction, OrderStatus, ProductStatus},
        order_items::{self, Column as OrderItemCol},
        orders::Column as OrderCol,
        product_price_history::Column as PriceHistoryCol,
        product_questions::{ActiveModel as QuestionActive, Column as QuestionCol},
        product_reviews::{ActiveModel as ReviewActive, Column as ReviewCol},
        products::{ActiveModel as ProductActive, Column as ProdCol},
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::{AuthUser, RequestContext, ensure_admin},
    models::{Category, PriceHistoryEntry, Product, Question, Review},
    response::{ApiResponse, IdResponse, Meta},
    routes::params::{AdminProductQuery, LowStockQuery, Pagination, ProductQuery, ProductSort},
    services::{favorite_service, tracking_service},
    state::AppState,
};

const AVERAGE_RATING_SQL: &str = "(SELECT COALESCE(AVG(r.rating), 0) FROM product_reviews r WHERE r.product_id = products.id)";
pub(crate) const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

fn search_condition(q: &str) -> Condition {
    let pattern = format!("%{}%", q.trim());
    Condition::any()
        .add(Expr::col(ProdCol::Name).ilike(pattern.clone()))
        .add(Expr::col(ProdCol::Description).ilike(pattern))
}

fn validate_product_fields(name: Option<&str>, price: Option<Decimal>, stock: Option<i32>) -> AppResult<()> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("Product name is required"));
        }
        ensure_max_len("Product name", name.trim(), 200)?;
    }
    if let Some(price) = price {
        if price <= Decimal::ZERO {
            return Err(AppError::bad_request("Price must be greater than zero"));
        }
    }
    if let Some(stock) = stock {
        if stock < 0 {
            return Err(AppError::bad_request("Stock cannot be negative"));
        }
    }
    Ok(())
}

async fn ensure_category(state: &AppState, category_id: Option<Uuid>) -> AppResult<()> {
    let Some(id) = category_id else {
        return Ok(());
    };
    match Categories::find_by_id(id).one(&state.orm).await? {
        Some(_) => Ok(()),
        None => Err(AppError::bad_request("Category does not exist")),
    }
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(ApiResponse::success(
        "OK",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    state: &AppState,
    ctx: &RequestContext,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(&ctx.user)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Category name is required"));
    }
    ensure_max_len("Category name", name, 100)?;
    if let Some(parent_id) = payload.parent_id {
        if Categories::find_by_id(parent_id).one(&state.orm).await?.is_none() {
            return Err(AppError::bad_request("Parent category does not exist"));
        }
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(payload.description),
        parent_id: Set(payload.parent_id),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Create,
            "Category",
            category.id,
            format!("Created category {}", category.name),
        ),
    )
    .await;

    Ok(ApiResponse::item("Category created", Category::from(category)))
}

/// Public catalog listing. Only active products are shown.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize_with_default(12);

    let mut condition = Condition::all().add(ProdCol::Status.eq(ProductStatus::Active));
    if let Some(category_id) = query.category_id {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }
    if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
        condition = condition.add(search_condition(q));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(ProdCol::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(ProdCol::Price.lte(max_price));
    }

    let mut finder = Products::find().filter(condition);
    finder = match query.sort.unwrap_or_default() {
        ProductSort::Newest => finder.order_by_desc(ProdCol::CreatedAt),
        ProductSort::PriceLow => finder.order_by_asc(ProdCol::Price),
        ProductSort::PriceHigh => finder.order_by_desc(ProdCol::Price),
        ProductSort::Rating => finder
            .order_by_desc(Expr::cust(AVERAGE_RATING_SQL))
            .order_by_desc(ProdCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        ProductList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub(crate) async fn average_rating(state: &AppState, product_id: Uuid) -> AppResult<f64> {
    let avg: Option<f64> = sqlx::query_scalar(
        "SELECT AVG(rating)::float8 FROM product_reviews WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_one(&state.pool)
    .await?;
    Ok(avg.unwrap_or(0.0))
}

/// Product page. Every call counts as one view.
pub async fn get_product(
    state: &AppState,
    viewer: Option<&AuthUser>,
    id: Uuid,
) -> AppResult<ApiResponse<ProductDetail>> {
    let updated = Products::update_many()
        .col_expr(ProdCol::ViewCount, Expr::col(ProdCol::ViewCount).add(1))
        .filter(ProdCol::Id.eq(id))
        .exec(&state.orm)
        .await?;
    if updated.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    let product = Products::find_by_id(id).one(&state.orm).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let average_rating = average_rating(state, product.id).await?;

    let reviews = ProductReviews::find()
        .filter(ReviewCol::ProductId.eq(product.id))
        .order_by_desc(ReviewCol::CreatedAt)
        .limit(10)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();

    let questions = ProductQuestions::find()
        .filter(
            Condition::all()
                .add(QuestionCol::ProductId.eq(product.id))
                .add(QuestionCol::IsPublic.eq(true)),
        )
        .order_by_desc(QuestionCol::CreatedAt)
        .limit(10)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Question::from)
        .collect();

    let is_favorited = match viewer {
        Some(user) => favorite_service::is_favorited(state, user.user_id, product.id).await?,
        None => false,
    };

    let related_products = match product.category_id {
        Some(category_id) => Products::find()
            .filter(
                Condition::all()
                    .add(ProdCol::CategoryId.eq(category_id))
                    .add(ProdCol::Status.eq(ProductStatus::Active))
                    .add(ProdCol::Id.ne(product.id)),
            )
            .order_by_desc(ProdCol::CreatedAt)
            .limit(4)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(Product::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(ApiResponse::item(
        "OK",
        ProductDetail {
            product: Product::from(product),
            average_rating,
            reviews,
            questions,
            is_favorited,
            related_products,
        },
    ))
}

pub async fn list_price_history(
    state: &AppState,
    product_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<PriceHistoryList>> {
    if Products::find_by_id(product_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let (page, limit, offset) = pagination.normalize();
    let finder = ProductPriceHistory::find()
        .filter(PriceHistoryCol::ProductId.eq(product_id))
        .order_by_desc(PriceHistoryCol::ChangedAt);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PriceHistoryEntry::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        PriceHistoryList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

/// Creates or replaces the caller's review. Only buyers of the product may review it.
pub async fn add_review(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: ReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::bad_request("Rating must be between 1 and 5"));
    }
    if Products::find_by_id(product_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let purchases = OrderItems::find()
        .join(JoinType::InnerJoin, order_items::Relation::Orders.def())
        .filter(
            Condition::all()
                .add(OrderItemCol::ProductId.eq(product_id))
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Status.is_in(OrderStatus::PURCHASED)),
        )
        .count(&state.orm)
        .await?;
    if purchases == 0 {
        return Err(AppError::bad_request(
            "Only customers who bought this product can review it",
        ));
    }

    let existing = ProductReviews::find()
        .filter(
            Condition::all()
                .add(ReviewCol::ProductId.eq(product_id))
                .add(ReviewCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;

    let (message, review) = match existing {
        Some(review) => {
            let mut active: ReviewActive = review.into();
            active.rating = Set(payload.rating);
            active.comment = Set(payload.comment);
            active.updated_at = Set(Utc::now().into());
            ("Review updated", active.update(&state.orm).await?)
        }
        None => {
            let review = ReviewActive {
                id: Set(Uuid::new_v4()),
                product_id: Set(product_id),
                user_id: Set(user.user_id),
                rating: Set(payload.rating),
                comment: Set(payload.comment),
                ..Default::default()
            }
            .insert(&state.orm)
            .await?;
            ("Review added", review)
        }
    };

    Ok(ApiResponse::item(message, Review::from(review)))
}

pub async fn ask_question(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: AskQuestionRequest,
) -> AppResult<ApiResponse<Question>> {
    let text = payload.question.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("Question is required"));
    }
    if Products::find_by_id(product_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let question = QuestionActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        user_id: Set(user.user_id),
        question: Set(text.to_string()),
        answer: Set(None),
        answered_by: Set(None),
        answered_at: Set(None),
        is_public: Set(true),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::item("Question submitted", Question::from(question)))
}

pub async fn list_products_admin(
    state: &AppState,
    user: &AuthUser,
    query: AdminProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
        condition = condition.add(search_condition(q));
    }
    if let Some(status) = query.status {
        condition = condition.add(ProdCol::Status.eq(status));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(ProdCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        ProductList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}

pub async fn create_product(
    state: &AppState,
    ctx: &RequestContext,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(&ctx.user)?;
    validate_product_fields(Some(&payload.name), Some(payload.price), Some(payload.stock))?;
    ensure_category(state, payload.category_id).await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category_id: Set(payload.category_id),
        price: Set(payload.price),
        stock: Set(payload.stock),
        status: Set(payload.status.unwrap_or(ProductStatus::Active)),
        view_count: Set(0),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Create,
            "Product",
            product.id,
            format!("Created product {}", product.name),
        ),
    )
    .await;

    Ok(ApiResponse::item("Product created", Product::from(product)))
}

/// Edits a product. A changed price is recorded and announced to trackers
/// in the same transaction as the edit.
pub async fn update_product(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductUpdateResult>> {
    ensure_admin(&ctx.user)?;
    validate_product_fields(payload.name.as_deref(), payload.price, payload.stock)?;
    ensure_category(state, payload.category_id).await?;

    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    let old_price = product.price;

    let mut active: ProductActive = product.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(Some(category_id));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&txn).await?;

    let price_changed = product.price != old_price;
    let trackers_notified = if price_changed {
        tracking_service::record_price_change(&txn, &product, product.price).await?
    } else {
        0
    };

    txn.commit().await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Update,
            "Product",
            product.id,
            format!("Updated product {}", product.name),
        ),
    )
    .await;

    Ok(ApiResponse::item(
        "Product updated",
        ProductUpdateResult {
            product: Product::from(product),
            price_changed,
            trackers_notified,
        },
    ))
}

pub async fn delete_product(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
) -> AppResult<ApiResponse<IdResponse>> {
    ensure_admin(&ctx.user)?;

    let product = Products::find_by_id(id).one(&state.orm).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    Products::delete_by_id(product.id).exec(&state.orm).await?;

    log_admin_action(
        &state.pool,
        ctx,
        SystemLogEntry::new(
            LogAction::Delete,
            "Product",
            product.id,
            format!("Deleted product {}", product.name),
        ),
    )
    .await;

    Ok(ApiResponse::item("Product deleted", IdResponse { id: product.id }))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD).max(0);

    let finder = Products::find()
        .filter(ProdCol::Stock.lt(threshold))
        .order_by_asc(ProdCol::Stock);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        ProductList { items },
        Some(Meta::paged(page, limit, total)),
    ))
}
