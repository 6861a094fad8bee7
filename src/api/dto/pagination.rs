//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::pagination::{Page, PageRequest};

/// `page` / `limit` query parameters.
///
/// Uses `serde_with` to parse numbers from query strings; a non-numeric value
/// is rejected, an out-of-range one is clamped by [`PageRequest`].
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Pagination block of the analytics response.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl<T> From<&Page<T>> for PaginationMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Query;
    use axum::extract::rejection::QueryRejection;
    use axum::http::Uri;

    fn parse(query: &str) -> Result<PageParams, QueryRejection> {
        let uri: Uri = format!("/links?{query}").parse().unwrap();
        Query::try_from_uri(&uri).map(|Query(params)| params)
    }

    #[test]
    fn test_missing_params_use_defaults() {
        let req = parse("").unwrap().to_request();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let req = parse("page=0&limit=1000").unwrap().to_request();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 100);
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        assert!(parse("page=abc").is_err());
        assert!(parse("limit=ten").is_err());
    }

    #[test]
    fn test_meta_uses_camel_case_total_pages() {
        let page = Page::new(vec![(); 3], 25, PageRequest::new(Some(3), Some(10)));
        let json = serde_json::to_value(PaginationMeta::from(&page)).unwrap();

        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["page"], 3);
        assert_eq!(json["total"], 25);
    }
}
