//! Pagination windows
//!
//! Every endpoint family pages through an ordered list (search hits, requested
//! UIDs, matching studies) with a requested offset and page length. Requests
//! are never rejected for out-of-range values; the window is clamped instead.
//!
//! # Policy
//!
//! - a negative `size` is treated as `0`, a `size` beyond `total` is clamped to `total`
//! - a negative `start`, or a `start` at or beyond `total`, yields an empty page
//! - otherwise the page ends at `min(start + size, total)`
//!
//! The resulting bounds always satisfy `start <= end <= total`.

use std::ops::Range;

/// The visible `[start, end)` slice of an ordered result list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    /// Compute the window for a list of `total` items
    pub fn new(total: usize, start: i64, size: i64) -> Self {
        let size = usize::try_from(size.max(0)).unwrap_or(usize::MAX).min(total);

        let start = match usize::try_from(start) {
            Ok(start) if start < total => start,
            // Empty page, anchored inside [0, total]
            Ok(_) => return Self { start: total, end: total },
            Err(_) => return Self { start: 0, end: 0 },
        };

        Self {
            start,
            end: start.saturating_add(size).min(total),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Borrow the window out of `items`
    ///
    /// `items` may be shorter than the `total` the window was computed for
    /// (a backend can return fewer hits than it counted); the slice is cut
    /// to whatever is available.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }

    /// Offset of the following page, if any items remain after this one
    pub fn next_start(&self, total: usize) -> Option<usize> {
        (!self.is_empty() && self.end < total).then_some(self.end)
    }
}

/// A requested offset or page length as reported back: negatives read as `0`
pub fn non_negative(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_partial_last_page() {
        let window = PageWindow::new(10, 8, 5);
        assert_eq!(window.range(), 8..10);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_window_start_beyond_total() {
        let window = PageWindow::new(10, 15, 5);
        assert!(window.is_empty());
        assert_eq!(window.range(), 10..10);
    }

    #[test]
    fn test_window_start_equal_total() {
        assert!(PageWindow::new(10, 10, 5).is_empty());
    }

    #[test]
    fn test_window_negative_start() {
        let window = PageWindow::new(10, -1, 5);
        assert!(window.is_empty());
        assert_eq!(window.range(), 0..0);
    }

    #[test]
    fn test_window_size_clamped_to_total() {
        assert_eq!(PageWindow::new(3, 0, 20).range(), 0..3);
    }

    #[test]
    fn test_window_zero_and_negative_size() {
        assert!(PageWindow::new(10, 2, 0).is_empty());
        assert!(PageWindow::new(10, 2, -4).is_empty());
    }

    #[test]
    fn test_window_empty_list() {
        let window = PageWindow::new(0, 0, 20);
        assert!(window.is_empty());
        assert_eq!(window.range(), 0..0);
    }

    #[test]
    fn test_window_huge_values_do_not_overflow() {
        assert_eq!(PageWindow::new(10, 5, i64::MAX).range(), 5..10);
        assert!(PageWindow::new(10, i64::MAX, i64::MAX).is_empty());
        assert!(PageWindow::new(10, i64::MIN, 3).is_empty());
    }

    #[test]
    fn test_window_bounds_hold_for_all_inputs() {
        for total in 0..12usize {
            for start in -3..15i64 {
                for size in -3..15i64 {
                    let w = PageWindow::new(total, start, size);
                    assert!(w.start <= w.end, "{total} {start} {size}");
                    assert!(w.end <= total, "{total} {start} {size}");
                    assert!(w.len() as i64 <= size.max(0));
                }
            }
        }
    }

    #[test]
    fn test_slice_shorter_than_total() {
        let items = vec!["a", "b", "c"];
        let window = PageWindow::new(10, 1, 5);
        assert_eq!(window.slice(&items), &["b", "c"]);

        let window = PageWindow::new(10, 5, 5);
        assert!(window.slice(&items).is_empty());
    }

    #[test]
    fn test_next_start() {
        assert_eq!(PageWindow::new(10, 0, 4).next_start(10), Some(4));
        assert_eq!(PageWindow::new(10, 8, 4).next_start(10), None);
        assert_eq!(PageWindow::new(10, 20, 4).next_start(10), None);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(-5), 0);
        assert_eq!(non_negative(0), 0);
        assert_eq!(non_negative(20), 20);
    }
}
