//! Page request normalization and paged results.

/// Page used when the client sends none (or a value below 1).
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the client sends none.
pub const DEFAULT_LIMIT: i64 = 10;
/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;

/// A normalized page request: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    /// Builds a page request from raw client input.
    ///
    /// Missing values take the defaults; out-of-range values are clamped
    /// rather than rejected.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; zero when there is nothing to page through.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the metadata needed to render pagination.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages: request.total_pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_is_clamped_to_one() {
        assert_eq!(PageRequest::new(Some(0), None).page(), 1);
        assert_eq!(PageRequest::new(Some(-5), None).page(), 1);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::new(None, Some(0)).limit(), 1);
        assert_eq!(PageRequest::new(None, Some(-3)).limit(), 1);
        assert_eq!(PageRequest::new(None, Some(500)).limit(), 100);
        assert_eq!(PageRequest::new(None, Some(100)).limit(), 100);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest::new(Some(1), Some(10));
        assert_eq!(req.total_pages(25), 3);
        assert_eq!(req.total_pages(30), 3);
        assert_eq!(req.total_pages(31), 4);
        assert_eq!(req.total_pages(1), 1);
        assert_eq!(req.total_pages(0), 0);
    }

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![1, 2, 3], 25, PageRequest::new(Some(3), Some(10)));
        assert_eq!(page.page, 3);
        assert_eq!(page.limit, 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 3);
    }
}
