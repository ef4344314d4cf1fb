//! Page requests and pagination metadata

use serde::Serialize;
use utoipa::ToSchema;

/// Largest page size a client may ask for
pub const MAX_LIMIT: i64 = 100;

/// Highest page number accepted; keeps `page * limit` within `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Resolved page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Apply defaults and clamp to sane bounds.
    ///
    /// Page numbers are kept within `1..=MAX_PAGE`; limit within `1..=MAX_LIMIT`.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Pagination block of list responses
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let PageRequest { page, limit } = request;
        Self {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
            has_next: page * limit < total,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(PageRequest::new(None, None, 10), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(500), 20), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(Some(3), Some(0), 20), PageRequest { page: 3, limit: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(10), 20).offset(), 20);
    }

    #[test]
    fn test_pagination_metadata() {
        let p = Pagination::new(PageRequest { page: 1, limit: 10 }, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let p = Pagination::new(PageRequest { page: 3, limit: 10 }, 25);
        assert!(!p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(PageRequest { page: 1, limit: 10 }, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
    }

    #[test]
    fn test_huge_page_number_is_capped() {
        let page = PageRequest::new(Some(i64::MAX), Some(MAX_LIMIT), 10);
        assert_eq!(page.page, MAX_PAGE);
        assert!(page.offset() >= 0);

        let p = Pagination::new(page, 5);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
        assert!(p.has_prev);

        assert_eq!(PageRequest::new(Some(i64::MIN), None, 10).page, 1);
    }
}
