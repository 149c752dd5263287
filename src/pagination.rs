//! # Pagination Engine
//!
//! Slices an ordered sequence by a `(start, size)` window and reports the
//! bounds of what was returned. `total` is always the length of the whole
//! sequence, never of the returned slice.

use crate::models::PaginationMeta;

/// Requested window. `size == None` means "to the end".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaginationWindow {
    pub start: i64,
    pub size: Option<usize>,
}

impl PaginationWindow {
    pub fn new(start: i64, size: Option<usize>) -> Self {
        Self { start, size }
    }
}

#[derive(Debug, PartialEq)]
pub struct PaginationResult<'a, T> {
    pub items: &'a [T],
    pub start: usize,
    pub size: usize,
    pub total: usize,
}

impl<T> PaginationResult<'_, T> {
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            start: self.start,
            size: self.size,
            total: self.total,
        }
    }
}

/// Returns the window of `items` described by `window`.
///
/// Negative starts are clamped to zero. A start at or past the end yields an
/// empty page that still reports the requested start.
pub fn paginate<T>(items: &[T], window: PaginationWindow) -> PaginationResult<'_, T> {
    let total = items.len();
    let start = usize::try_from(window.start.max(0)).unwrap_or(usize::MAX);

    if start >= total {
        return PaginationResult {
            items: &[],
            start,
            size: 0,
            total,
        };
    }

    let end = match window.size {
        Some(size) => start.saturating_add(size).min(total),
        None => total,
    };

    PaginationResult {
        items: &items[start..end],
        start,
        size: end - start,
        total,
    }
}
