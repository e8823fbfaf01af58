//! Page-numbered pagination helpers shared by listings.

use serde::Serialize;

/// Requested page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.max(1),
        }
    }

    /// Clamp the request against `total` rows and compute the slice to load.
    pub fn resolve(self, total: u64) -> PageWindow {
        let per_page = u64::from(self.per_page);
        let total_pages = total.div_ceil(per_page).max(1);
        let page = u64::from(self.page).min(total_pages);
        PageWindow {
            page: page as u32,
            per_page: self.per_page,
            total_pages: total_pages as u32,
            total,
            offset: (page - 1) * per_page,
        }
    }
}

/// Clamped page position for a known row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub offset: u64,
}

impl PageWindow {
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// One page of results with enough metadata to render page links.
#[derive(Debug, Clone, Serialize)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            page: window.page,
            per_page: window.per_page,
            total_pages: window.total_pages,
            total: window.total,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
