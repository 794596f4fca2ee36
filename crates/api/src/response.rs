//! Paginated response envelope.
//!
//! Every list endpoint returns `{count, next, previous, results}` where
//! `next`/`previous` are relative URLs that keep the caller's other query
//! parameters.

use axum::http::Uri;
use serde::Serialize;
use yamdb_core::paging::PageRequest;

/// One page of results.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    /// Build the envelope for `request` given the full match count.
    ///
    /// `uri` must be the original request URI so links include any router
    /// prefix.
    pub fn new(uri: &Uri, request: &PageRequest, count: i64, results: Vec<T>) -> Self {
        Self {
            count,
            next: request.next_page(count).map(|p| page_link(uri, p)),
            previous: request.previous_page().map(|p| page_link(uri, p)),
            results,
        }
    }
}

/// `uri` with its `page` parameter replaced by `page`.
fn page_link(uri: &Uri, page: i64) -> String {
    let page_param = format!("page={page}");
    let mut params: Vec<&str> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|p| !p.is_empty() && *p != "page" && !p.starts_with("page="))
        .collect();
    params.push(&page_param);
    format!("{}?{}", uri.path(), params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn link_appends_page_when_query_is_empty() {
        assert_eq!(
            page_link(&uri("/api/v1/titles"), 2),
            "/api/v1/titles?page=2"
        );
    }

    #[test]
    fn link_replaces_existing_page_and_keeps_filters() {
        assert_eq!(
            page_link(&uri("/api/v1/titles?year=1999&page=3&genre=drama"), 4),
            "/api/v1/titles?year=1999&genre=drama&page=4"
        );
    }

    #[test]
    fn middle_page_has_both_links() {
        let request = PageRequest::new(Some(2), 10).unwrap();
        let page = Page::new(&uri("/api/v1/genres?page=2"), &request, 25, vec![1, 2, 3]);
        assert_eq!(page.count, 25);
        assert_eq!(page.next.as_deref(), Some("/api/v1/genres?page=3"));
        assert_eq!(page.previous.as_deref(), Some("/api/v1/genres?page=1"));
    }

    #[test]
    fn single_page_has_no_links() {
        let request = PageRequest::new(None, 10).unwrap();
        let page: Page<i32> = Page::new(&uri("/api/v1/genres"), &request, 0, Vec::new());
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
        assert!(page.results.is_empty());
    }
}
