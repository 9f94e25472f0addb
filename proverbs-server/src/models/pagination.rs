//! Pagination types

use serde::{Deserialize, Serialize};

/// Maximum items per page
const MAX_LIMIT: u32 = 100;

/// Default items per page
const DEFAULT_LIMIT: u32 = 5;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Limit is clamped to 1..=100
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }

    /// Cut this page out of an in-memory slice.
    ///
    /// Pages past the end yield an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: usize,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl<T: Clone> Paginated<T> {
    /// Build a page from the full in-memory collection.
    pub fn from_slice(all: &[T], pagination: Pagination) -> Self {
        Self {
            items: pagination.slice(all).to_vec(),
            total: all.len(),
            page: pagination.page,
            limit: pagination.limit,
        }
    }
}

impl<T> Paginated<T> {
    /// Calculate total number of pages.
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            1
        } else {
            let limit = self.limit.max(1) as usize;
            self.total.div_ceil(limit).max(1) as u32
        }
    }

    /// Check if there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        let p = Pagination::new(1, 5);
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(2, 5);
        assert_eq!(p.offset(), 5);

        let p = Pagination::new(3, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn defaults_are_first_page_of_five() {
        let p = Pagination::from(PaginationParams::default());
        assert_eq!(p, Pagination::new(1, 5));
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn clamps_page() {
        let p = Pagination::new(0, 10);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn clamps_limit() {
        let p = Pagination::new(1, 0);
        assert_eq!(p.limit, 1);

        let p = Pagination::new(1, 999);
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn slice_past_the_end_is_empty() {
        let items: Vec<u32> = (0..17).collect();
        assert_eq!(Pagination::new(4, 5).slice(&items), &[15, 16]);
        assert!(Pagination::new(5, 5).slice(&items).is_empty());
        assert!(Pagination::new(u32::MAX, 100).slice(&items).is_empty());
    }

    #[test]
    fn total_pages() {
        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 0,
            page: 1,
            limit: 5,
        };
        assert_eq!(paginated.total_pages(), 1);

        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 17,
            page: 1,
            limit: 5,
        };
        assert_eq!(paginated.total_pages(), 4);

        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 100,
            page: 1,
            limit: 10,
        };
        assert_eq!(paginated.total_pages(), 10);
    }

    #[test]
    fn has_next_prev() {
        let all: Vec<u32> = (0..15).collect();

        let first = Paginated::from_slice(&all, Pagination::new(1, 5));
        assert!(first.has_next());
        assert!(!first.has_prev());

        let middle = Paginated::from_slice(&all, Pagination::new(2, 5));
        assert!(middle.has_next());
        assert!(middle.has_prev());

        let last = Paginated::from_slice(&all, Pagination::new(3, 5));
        assert!(!last.has_next());
        assert!(last.has_prev());
        assert_eq!(last.items, vec![10, 11, 12, 13, 14]);
    }
}
