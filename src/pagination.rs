/// Pagination Controller
///
/// Maps `(page, page_size, total)` to the slice of the derived view that is
/// currently visible. Page numbers are 1-based. Out-of-range requests clamp
/// to the nearest valid page instead of failing, and any change to the
/// upstream query resets the position to page 1.
///
/// # Examples
///
/// ```
/// use livegrid::Pagination;
///
/// let mut pages = Pagination::new(25).unwrap();
/// pages.reset(60);
/// assert_eq!(pages.total_pages(), 3);
///
/// pages.set_page(99);
/// assert_eq!(pages.page(), 3);
/// assert_eq!(pages.range(), 50..60);
/// assert_eq!(pages.item_range(), Some((51, 60)));
/// ```

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Serializable pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Result<Self, GridError> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        Ok(Pagination {
            page: 1,
            page_size,
            total: 0,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `ceil(total / page_size)`; zero when there is nothing to show.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    /// Moves to `page`, clamped into `[1, total_pages]`. Returns true if the
    /// page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let clamped = self.clamp(page);
        if clamped != page {
            log::debug!("page {} out of range, clamped to {}", page, clamped);
        }
        let changed = clamped != self.page;
        self.page = clamped;
        changed
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), GridError> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Adopts a new upstream total after a query change. The position is
    /// always reset to page 1.
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.page = 1;
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn previous(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }

    pub fn next(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    /// Positions of the derived view visible on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    /// 1-based inclusive row numbers of the current page ("51-60 of 60").
    pub fn item_range(&self) -> Option<(usize, usize)> {
        let range = self.range();
        if range.is_empty() {
            None
        } else {
            Some((range.start + 1, range.end))
        }
    }

    pub fn state(&self) -> PaginationState {
        PaginationState {
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(Pagination::new(0), Err(GridError::InvalidPageSize)));
        let mut pages = Pagination::new(10).unwrap();
        assert!(pages.set_page_size(0).is_err());
        assert_eq!(pages.page_size(), 10);
    }

    #[test]
    fn test_total_pages() {
        let mut pages = Pagination::new(25).unwrap();
        for (total, expected) in [(0, 0), (1, 1), (25, 1), (26, 2), (1000, 40)] {
            pages.reset(total);
            assert_eq!(pages.total_pages(), expected, "total {}", total);
        }
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pages = Pagination::new(10).unwrap();
        pages.reset(95);

        pages.set_page(0);
        assert_eq!(pages.page(), 1);
        pages.set_page(11);
        assert_eq!(pages.page(), 10);
        assert_eq!(pages.range(), 90..95);
        assert!(!pages.range().is_empty());

        pages.set_page(4);
        assert_eq!(pages.page(), 4);
        assert_eq!(pages.range(), 30..40);
    }

    #[test]
    fn test_clamp_bounds_for_many_shapes() {
        for total in [1usize, 7, 10, 11, 99, 100] {
            for size in [1usize, 3, 10, 50] {
                let mut pages = Pagination::new(size).unwrap();
                pages.reset(total);
                let last = pages.total_pages();
                for request in [0, last + 1, last + 50, usize::MAX] {
                    pages.set_page(request);
                    let expected = if request == 0 { 1 } else { last };
                    assert_eq!(pages.page(), expected);
                    assert!(!pages.range().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_empty_total() {
        let mut pages = Pagination::new(10).unwrap();
        pages.reset(0);
        pages.set_page(3);
        assert_eq!(pages.page(), 1);
        assert!(pages.range().is_empty());
        assert_eq!(pages.item_range(), None);
        assert!(!pages.has_next());
        assert!(!pages.has_previous());
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut pages = Pagination::new(10).unwrap();
        pages.reset(100);
        pages.set_page(5);
        pages.set_page_size(25).unwrap();
        assert_eq!(pages.page(), 1);
        assert_eq!(pages.total_pages(), 4);
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut pages = Pagination::new(10).unwrap();
        pages.reset(100);
        pages.set_page(7);
        pages.reset(100);
        assert_eq!(pages.page(), 1);
    }

    #[test]
    fn test_previous_next() {
        let mut pages = Pagination::new(10).unwrap();
        pages.reset(25);
        assert!(!pages.previous());
        assert!(pages.next());
        assert!(pages.next());
        assert!(!pages.next());
        assert_eq!(pages.page(), 3);
        assert!(pages.previous());
        assert_eq!(pages.page(), 2);
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (0..12).collect();
        let mut pages = Pagination::new(5).unwrap();
        pages.reset(items.len());
        pages.set_page(3);
        assert_eq!(pages.slice(&items), &[10, 11]);
        assert_eq!(pages.item_range(), Some((11, 12)));
    }
}
