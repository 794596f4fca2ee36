//! Page-number pagination arithmetic.
//!
//! Pages are 1-based. The page size is a server setting, clamped to
//! `1..=MAX_PAGE_SIZE`.

use crate::error::CoreError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a configured page size into the supported range.
pub fn clamp_page_size(size: i64) -> i64 {
    size.clamp(1, MAX_PAGE_SIZE)
}

/// Number of pages needed for `total` items. An empty result still has one
/// (empty) page.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + page_size - 1) / page_size
    }
}

/// A validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Build a request for `page` (default 1). Pages below 1 are rejected.
    pub fn new(page: Option<i64>, page_size: i64) -> Result<Self, CoreError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(CoreError::not_found("Page", page));
        }
        Ok(Self {
            page,
            page_size: clamp_page_size(page_size),
        })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Reject pages past the last one once the total is known.
    pub fn ensure_in_range(&self, total: i64) -> Result<(), CoreError> {
        if self.page > page_count(total, self.page_size) {
            return Err(CoreError::not_found("Page", self.page));
        }
        Ok(())
    }

    pub fn next_page(&self, total: i64) -> Option<i64> {
        (self.page < page_count(total, self.page_size)).then_some(self.page + 1)
    }

    pub fn previous_page(&self) -> Option<i64> {
        (self.page > 1).then_some(self.page - 1)
    }
}
