use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
    pub total_pages: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
            total_pages: Some(total_pages),
        }
    }

    /// Meta for a paged listing where the count came back from `PaginatorTrait::count`.
    pub fn paged(page: i64, per_page: i64, total: u64) -> Self {
        Self::new(page, per_page, total as i64)
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
            total_pages: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    /// Single-object response with an empty meta block.
    pub fn item(message: impl Into<String>, data: T) -> Self {
        Self::success(message, data, Some(Meta::empty()))
    }
}

/// Body for operations that only need to echo the affected row id.
#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    pub id: uuid::Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Meta::new(1, 12, 25).total_pages, Some(3));
        assert_eq!(Meta::new(1, 12, 24).total_pages, Some(2));
        assert_eq!(Meta::paged(1, 20, 0).total_pages, Some(0));
    }

    #[test]
    fn item_carries_empty_meta() {
        let resp = ApiResponse::item("OK", 7);
        assert_eq!(resp.data, Some(7));
        let meta = resp.meta.expect("meta");
        assert!(meta.page.is_none() && meta.total_pages.is_none());
    }
}
