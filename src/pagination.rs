//! Shared page envelope used by every listing endpoint.

use serde::Serialize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 16;

/// `{ data, total, page, totalPages }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: usize, page: PageRequest) -> Self {
        Self {
            data,
            total,
            page: page.page,
            total_pages: total_pages(total, page.limit),
        }
    }
}

/// A resolved 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Fills in defaults and clamps both values to at least one.
    pub fn resolve(page: Option<usize>, limit: Option<usize>, default_limit: usize) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(default_limit).max(1),
        }
    }

    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

pub fn total_pages(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}
