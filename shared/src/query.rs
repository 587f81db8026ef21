//! List-query types
//!
//! Paged listing requests and responses shared by the repository layer.

use serde::{Deserialize, Serialize};

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// List query - paged listing with an optional name filter and sort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQuery {
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Records per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Case-insensitive substring filter on the name column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Sort column; columns outside the repository's allow-list fall back
    /// to the default sort instead of erroring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

impl ListQuery {
    /// Simple query (first page, default size, no filter)
    pub fn all() -> Self {
        Self {
            page: None,
            limit: None,
            search: None,
            sort: None,
            direction: None,
        }
    }

    /// Add pagination
    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Add a name filter
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Add sorting
    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(column.into());
        self.direction = Some(direction);
        self
    }
}

/// Paged response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Page of records
    pub data: Vec<T>,
    /// Total record count across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Records per page
    pub limit: u32,
    /// Total page count
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            ((total as f64) / (limit as f64)).ceil() as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_builder() {
        let query = ListQuery::all()
            .search("glass")
            .order_by("name", SortDirection::Desc)
            .paginate(2, 25);

        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.search, Some("glass".to_string()));
        assert_eq!(query.sort, Some("name".to_string()));
        assert_eq!(query.direction, Some(SortDirection::Desc));
    }

    #[test]
    fn test_paginated_response() {
        let items = vec!["a", "b", "c"];
        let resp = PaginatedResponse::new(items, 100, 2, 10);

        assert_eq!(resp.total, 100);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.total_pages, 10);
    }

    #[test]
    fn test_paginated_response_partial_last_page() {
        let resp = PaginatedResponse::new(vec![1, 2, 3], 23, 1, 10);
        assert_eq!(resp.total_pages, 3);
    }
}
