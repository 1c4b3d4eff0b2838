//! Page cursor - page-walking arithmetic for a (guild, user) vouch listing
//!
//! The cursor never clamps on its own: callers decide whether an out-of-range
//! index is clamped (`clamped`) or rejected (`is_in_range`).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    page: u32,
    page_size: u32,
    total: i64,
}

impl PageCursor {
    /// Build a cursor for display arithmetic.
    ///
    /// Inputs are normalized rather than rejected: a `page_size` of zero
    /// becomes one and a negative `total` becomes zero. Listing calls reject a
    /// zero page size before a cursor is ever built, so the coercion only
    /// matters for callers constructing cursors by hand.
    pub fn new(page: u32, page_size: u32, total: i64) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
            total: total.max(0),
        }
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[inline]
    pub fn total(&self) -> i64 {
        self.total
    }

    /// `max(1, ceil(total / page_size))`
    pub fn total_pages(&self) -> u32 {
        let size = i64::from(self.page_size);
        let pages = (self.total + size - 1) / size;
        u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
    }

    /// Row offset of the first record on this page, saturating at `i64::MAX`
    pub fn offset(&self) -> i64 {
        i64::from(self.page).saturating_mul(i64::from(self.page_size))
    }

    /// 1-based position of the first record on this page within the whole listing
    pub fn first_ordinal(&self) -> i64 {
        self.offset().saturating_add(1)
    }

    pub fn is_in_range(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Same cursor with the page index pulled into `[0, total_pages - 1]`
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.min(self.total_pages() - 1),
            ..*self
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn next(&self) -> Option<Self> {
        self.has_next().then(|| Self {
            page: self.page + 1,
            ..*self
        })
    }

    pub fn previous(&self) -> Option<Self> {
        self.has_previous().then(|| Self {
            page: self.page - 1,
            ..*self
        })
    }

    /// Same position against a refreshed total
    pub fn with_total(&self, total: i64) -> Self {
        Self::new(self.page, self.page_size, total)
    }
}
