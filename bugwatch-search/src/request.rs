//! Request body for the issue search endpoint, built from a parsed query.
//!
//! ```
//! use bugwatch_search::{Pagination, SearchRequest, parse_query};
//!
//! let parsed = parse_query("is:unresolved sort:count");
//! let request = SearchRequest::from_parsed(&parsed, Pagination::new(2, 500));
//! assert_eq!(request.per_page, 100);
//! assert_eq!(request.sort.map(|s| s.field), Some("count".to_string()));
//! ```

use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::filters::{SearchFilters, SortConfig};
use crate::parser::ParsedQuery;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 50;
pub const MAX_PER_PAGE: u32 = 100;

/// Page selection. Values are clamped on construction: `page >= 1` and
/// `1 <= per_page <= MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Fill in defaults for missing values, then clamp.
    pub fn from_options(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self::new(page.unwrap_or(DEFAULT_PAGE), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip.
    #[inline]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// JSON body accepted by `POST /issues/search`.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortConfig>,
    pub page: u32,
    pub per_page: u32,
}

impl SearchRequest {
    /// Empty filters are omitted entirely rather than sent as `{}`.
    pub fn from_parsed(parsed: &ParsedQuery, pagination: Pagination) -> Self {
        let filters = Some(parsed.filters.clone()).filter(|f| !f.is_empty());
        Self {
            filters,
            sort: parsed.sort.clone(),
            page: pagination.page(),
            per_page: pagination.per_page(),
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}
