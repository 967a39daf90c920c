//! Page arithmetic for the document table.

use serde::{Deserialize, Serialize};

pub const MIN_ITEMS_PER_PAGE: u64 = 5;
pub const MAX_ITEMS_PER_PAGE: u64 = 100;
pub const DEFAULT_ITEMS_PER_PAGE: u64 = 10;

/// 1-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u64,
    items_per_page: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Pagination {
    pub fn new(items_per_page: u64) -> Self {
        Self { page: 1, items_per_page: items_per_page.clamp(MIN_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE) }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    pub fn set_items_per_page(&mut self, items_per_page: u64) {
        self.items_per_page = items_per_page.clamp(MIN_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE);
    }

    /// Documents before this page; saturates for absurd page numbers.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.items_per_page)
    }

    pub fn total_pages(&self, document_count: u64) -> u64 {
        document_count.div_ceil(self.items_per_page)
    }

    /// Advance one page, stopping at the last one.
    pub fn next(&mut self, total_pages: u64) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    /// Go back one page, stopping at the first one.
    pub fn previous(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Jump to `page`, clamped to `1..=total_pages`.
    pub fn go_to(&mut self, page: u64, total_pages: u64) {
        self.page = page.min(total_pages).max(1);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}
