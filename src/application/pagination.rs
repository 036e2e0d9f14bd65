//! Offset pagination shared by every listing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// A clamped `(page, limit)` pair; construction never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    limit: u32,
}

impl PageWindow {
    /// `page < 1` becomes 1, `limit < 1` becomes the default and
    /// `limit > MAX_LIMIT` becomes `MAX_LIMIT`.
    pub fn clamp(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(limit) if limit > i64::from(MAX_LIMIT) => MAX_LIMIT,
            Some(limit) if limit >= 1 => limit as u32,
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn page(self) -> u32 {
        self.page
    }

    pub fn limit(self) -> u32 {
        self.limit
    }

    pub fn offset(self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, window: PageWindow) -> Self {
        Self {
            total,
            page: window.page(),
            limit: window.limit(),
            total_pages: total_pages(total, window.limit()),
        }
    }
}

/// `ceil(total / limit)`.
pub fn total_pages(total: i64, limit: u32) -> i64 {
    let limit = i64::from(limit.max(1));
    (total.max(0) + limit - 1) / limit
}

/// One page of records in the shape stored in the list cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage<R> {
    pub items: Vec<R>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl<R> ListPage<R> {
    pub fn new(items: Vec<R>, total: i64, window: PageWindow) -> Self {
        let pagination = Pagination::new(total, window);
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}
