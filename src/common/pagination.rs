// src/common/pagination.rs

use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits an `i64` at the largest page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Normalized `page`/`limit` pair taken from a list query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn describe(&self, total: i64) -> Pagination {
        let total_pages = if total == 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        };
        Pagination {
            total,
            page: self.page,
            limit: self.limit,
            total_pages,
        }
    }
}

/// The `pagination` object every list endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// One page of rows plus the total row count for the same filter.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> Page<T> {
    /// `{ "<key>": [...], "pagination": {...} }`
    pub fn into_body(self, key: &str) -> Value {
        let mut body = json!({ "pagination": self.pagination });
        body[key] = json!(self.items);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_or_nonsense_values() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(-4)), PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(PageRequest::new(Some(2), Some(5_000)).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_and_total_pages() {
        let page = PageRequest::new(Some(3), Some(20));
        assert_eq!(page.offset(), 40);

        let meta = page.describe(41);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(page.describe(0).total_pages, 0);
        assert_eq!(page.describe(40).total_pages, 2);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_the_offset() {
        let page = PageRequest::new(Some(i64::MAX), Some(100));
        assert_eq!(page.page, MAX_PAGE);
        assert!(page.offset() >= 0);

        let bypassed = PageRequest { page: i64::MAX, limit: 100 };
        assert_eq!(bypassed.offset(), i64::MAX);
    }

    #[test]
    fn serializes_total_pages_in_camel_case() {
        let json = serde_json::to_value(PageRequest::new(None, None).describe(11)).unwrap();
        assert_eq!(json["totalPages"], 2);
        assert!(json.get("total_pages").is_none());
    }

    #[test]
    fn list_body_names_the_collection() {
        let page = Page {
            items: vec!["a", "b"],
            pagination: PageRequest::new(None, None).describe(2),
        };
        let body = page.into_body("residents");
        assert_eq!(body["residents"], json!(["a", "b"]));
        assert_eq!(body["pagination"]["total"], 2);
    }
}
