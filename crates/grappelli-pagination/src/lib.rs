//! # Grappelli Pagination
//!
//! Length-aware pagination primitives for the Grappelli framework.
//!
//! A [`Page`] carries one window of results together with the total count
//! across all pages, so consumers can render "page x of y" navigation
//! without issuing their own counting queries. [`Paginator`] holds the page
//! math; [`PaginatedResponse`] is the serializable envelope API layers
//! return.
//!
//! ## Example
//!
//! ```rust
//! use grappelli_pagination::Paginator;
//!
//! let paginator = Paginator::new(50, 15).unwrap();
//! assert_eq!(paginator.num_pages(), 4);
//! assert_eq!(paginator.window(4), (45, 15)); // offset, limit
//! ```

use serde::{Deserialize, Serialize};

/// Errors raised by pagination math
#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    /// The requested page number is outside the valid range
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// Page size must be a positive number
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// The requested page exists but contains no results
    #[error("That page contains no results")]
    EmptyPage,
}

pub type Result<T> = std::result::Result<T, PaginationError>;

/// Page math over a known total count
///
/// Mirrors the page/offset arithmetic of Django's `Paginator`: pages are
/// 1-indexed, the last page may be short, and an empty collection still has
/// exactly one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: usize,
    page_size: usize,
}

impl Paginator {
    /// Create a paginator for `count` items in pages of `page_size`
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPageSize`] when `page_size` is zero.
    pub fn new(count: usize, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        Ok(Self { count, page_size })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total number of pages (at least 1, even for an empty collection)
    pub fn num_pages(&self) -> usize {
        self.count.div_ceil(self.page_size).max(1)
    }

    /// All page numbers, 1-indexed
    ///
    /// ```
    /// use grappelli_pagination::Paginator;
    ///
    /// let pages: Vec<usize> = Paginator::new(50, 15).unwrap().page_range().collect();
    /// assert_eq!(pages, vec![1, 2, 3, 4]);
    /// ```
    pub fn page_range(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.num_pages()
    }

    /// The (offset, limit) window for a page, clamping page numbers below 1
    pub fn window(&self, page: usize) -> (usize, usize) {
        (page.saturating_sub(1) * self.page_size, self.page_size)
    }

    /// Validate that a page number addresses an existing page
    pub fn validate_number(&self, page: usize) -> Result<usize> {
        if page < 1 {
            return Err(PaginationError::InvalidPage(
                "That page number is less than 1".to_string(),
            ));
        }
        if page > self.num_pages() {
            return Err(PaginationError::EmptyPage);
        }
        Ok(page)
    }
}

/// A single page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in this page
    pub object_list: Vec<T>,
    /// Current page number (1-indexed)
    pub number: usize,
    /// Total number of pages
    pub num_pages: usize,
    /// Total number of items across all pages
    pub count: usize,
    /// Items per page
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Assemble a page from a result window and its paginator
    ///
    /// # Examples
    ///
    /// ```
    /// use grappelli_pagination::{Page, Paginator};
    ///
    /// let paginator = Paginator::new(50, 15).unwrap();
    /// let page = Page::new(vec!["a"; 15], 1, &paginator);
    /// assert_eq!(page.count, 50);
    /// assert_eq!(page.num_pages, 4);
    /// ```
    pub fn new(object_list: Vec<T>, number: usize, paginator: &Paginator) -> Self {
        Self {
            object_list,
            number,
            num_pages: paginator.num_pages(),
            count: paginator.count(),
            page_size: paginator.page_size(),
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    /// 1-based index of the first item on this page (0 when empty)
    ///
    /// ```
    /// use grappelli_pagination::{Page, Paginator};
    ///
    /// let paginator = Paginator::new(15, 3).unwrap();
    /// let page = Page::new(vec!["a", "b", "c"], 2, &paginator);
    /// assert_eq!(page.start_index(), 4);
    /// assert_eq!(page.end_index(), 6);
    /// ```
    pub fn start_index(&self) -> usize {
        if self.object_list.is_empty() {
            0
        } else {
            (self.number - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item on this page (0 when empty)
    pub fn end_index(&self) -> usize {
        if self.object_list.is_empty() {
            0
        } else {
            self.start_index() + self.object_list.len() - 1
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    /// The next page number, if any
    pub fn next_page_number(&self) -> Result<usize> {
        if self.has_next() {
            Ok(self.number + 1)
        } else {
            Err(PaginationError::EmptyPage)
        }
    }

    /// The previous page number, if any
    pub fn previous_page_number(&self) -> Result<usize> {
        if self.has_previous() {
            Ok(self.number - 1)
        } else {
            Err(PaginationError::InvalidPage(
                "That page number is less than 1".to_string(),
            ))
        }
    }

}

/// Paginated response envelope for API layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: usize,
    pub next: Option<usize>,
    pub previous: Option<usize>,
    pub results: Vec<T>,
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            count: page.count,
            next: page.next_page_number().ok(),
            previous: page.previous_page_number().ok(),
            results: page.object_list,
        }
    }
}
