//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

use super::filter::Filter;

/// Page position for a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of rows per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request. `page` and `page_size` are raised to at least 1.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Calculate the SQL `OFFSET` value: `(page - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Arguments of a paginated search: `where`, `offset` and `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    /// Equality predicates.
    #[serde(rename = "where")]
    pub filter: Filter,
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to return.
    pub limit: u64,
}

impl FindOptions {
    /// Search options for one page of `filter`.
    pub fn new(filter: Filter, page: &PageRequest) -> Self {
        Self {
            filter,
            offset: page.offset(),
            limit: page.limit(),
        }
    }
}

/// Rows of one page plus the total number of matches ignoring pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The rows on this page, in handle order.
    pub rows: Vec<T>,
    /// Total number of matching rows across all pages.
    pub count: u64,
}

impl<T> PageResponse<T> {
    /// Create a new page.
    pub fn new(rows: Vec<T>, count: u64) -> Self {
        Self { rows, count }
    }

    /// Number of pages needed to hold `count` rows at `page_size` each.
    pub fn total_pages(&self, page_size: u64) -> u64 {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(page_size.max(1))
        }
    }
}

fn default_page() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let page = PageRequest::new(3, 20);
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);

        let first = PageRequest::new(1, 1);
        assert_eq!(first.offset(), 0);
        assert_eq!(first.limit(), 1);
    }

    #[test]
    fn test_zero_inputs_are_raised() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_find_options() {
        let options = FindOptions::new(Filter::by_id(5i64), &PageRequest::new(2, 10));
        assert_eq!(options.offset, 10);
        assert_eq!(options.limit, 10);
        assert_eq!(options.filter, Filter::by_id(5i64));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PageResponse::<u8>::new(Vec::new(), 0).total_pages(10), 1);
        assert_eq!(PageResponse::new(vec![1u8], 21).total_pages(10), 3);
        assert_eq!(PageResponse::new(vec![1u8], 20).total_pages(10), 2);
    }
}
