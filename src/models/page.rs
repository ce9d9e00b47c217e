//! Pagination primitives shared by every store implementation.

use super::StoreError;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Larger requested sizes are clamped down to this
pub const MAX_PAGE_SIZE: i64 = 2000;

/// A validated, 0-based page request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    /// Rejects negative pages, empty pages and offsets that do not fit in an `i64`.
    /// Oversized pages are clamped to [`MAX_PAGE_SIZE`].
    pub fn new(page: i64, size: i64) -> Result<Self, StoreError> {
        if page < 0 {
            return Err(StoreError::InvalidArgument(format!(
                "page must not be negative, got {page}"
            )));
        }
        if size < 1 {
            return Err(StoreError::InvalidArgument(format!(
                "size must be at least 1, got {size}"
            )));
        }
        let request = Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
        };
        request.offset()?;
        Ok(request)
    }

    /// Number of rows to skip before this page starts
    pub fn offset(&self) -> Result<i64, StoreError> {
        self.page
            .checked_mul(self.size)
            .ok_or_else(|| StoreError::InvalidArgument("page offset is out of range".to_string()))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One slice of an ordered result set together with the size of the whole set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 {
            return 0;
        }
        (self.total + self.size - 1) / self.size
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}
