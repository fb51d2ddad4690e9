use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::enums::{
    FaqCategory, LogAction, OrderStatus, ProductStatus, RefundStatus, TicketPriority, TicketStatus,
};

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        self.normalize_with_default(20)
    }

    pub fn normalize_with_default(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

/// Highest page number a list request may ask for.
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
}

// Query structs repeat `page`/`per_page` instead of flattening `Pagination`:
// serde_urlencoded cannot parse numbers through `#[serde(flatten)]`.
macro_rules! paged_query {
    ($($query:ty),+ $(,)?) => {
        $(
            impl $query {
                pub fn pagination(&self) -> Pagination {
                    Pagination {
                        page: self.page,
                        per_page: self.per_page,
                    }
                }
            }
        )+
    };
}

paged_query!(
    ProductQuery,
    AdminProductQuery,
    OrderListQuery,
    RefundListQuery,
    TicketListQuery,
    FaqQuery,
    QuestionListQuery,
    UserListQuery,
    LogListQuery,
    LowStockQuery,
);

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category_id: Option<Uuid>,
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<ProductSort>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
    /// Matches order number or buyer email (admin listing only).
    pub q: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RefundListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<RefundStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TicketListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FaqQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category: Option<FaqCategory>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerFilter {
    Answered,
    Unanswered,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuestionListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<AnswerFilter>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub action: Option<LogAction>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub threshold: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        assert_eq!(Pagination::new(0, 0).normalize(), (1, 1, 0));
        assert_eq!(Pagination::new(3, 500).normalize(), (3, 100, 200));
    }

    #[test]
    fn huge_page_is_clamped_instead_of_overflowing() {
        let (page, per_page, offset) = Pagination::new(i64::MAX, 100).normalize();
        assert_eq!(page, MAX_PAGE);
        assert_eq!(per_page, 100);
        assert_eq!(offset, (MAX_PAGE - 1) * 100);
        assert!(offset >= 0);

        let (page, _, offset) = Pagination::new(i64::MIN, 10).normalize();
        assert_eq!((page, offset), (1, 0));
    }
}
