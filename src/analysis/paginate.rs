//! Fixed-size pagination.

use serde::Serialize;

/// One page of a list, plus the navigation state around it.
///
/// `current_page` is the page actually returned after clamping; callers
/// store it back so the page they hold matches the page they render.
/// An empty list has zero pages and reports `current_page == 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    /// 1-based row number of the first item, 0 when the page is empty.
    pub first_row: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert the items while keeping the navigation state.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            page_size: self.page_size,
            first_row: self.first_row,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// Number of pages needed for `len` items.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Clamp a requested page into `1..=total_pages`, or 0 when there are no pages.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        0
    } else {
        requested.clamp(1, total_pages)
    }
}

/// Return page `requested` (1-based) of `items`.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, requested: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let current_page = clamp_page(requested, total_pages);

    let (page_items, first_row) = if current_page == 0 {
        (Vec::new(), 0)
    } else {
        let start = (current_page - 1) * page_size;
        let end = (start + page_size).min(items.len());
        (items[start..end].to_vec(), start + 1)
    };

    Page {
        items: page_items,
        current_page,
        total_pages,
        total_items: items.len(),
        page_size,
        first_row,
        has_previous: current_page > 1,
        has_next: current_page < total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 15), 0);
        assert_eq!(total_pages(1, 15), 1);
        assert_eq!(total_pages(15, 15), 1);
        assert_eq!(total_pages(16, 15), 2);
        assert_eq!(total_pages(23, 10), 3);
    }

    #[test]
    fn test_empty_list_has_no_pages() {
        let page = paginate::<u32>(&[], 15, 1);

        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 0);
        assert_eq!(page.first_row, 0);
        assert!(page.is_empty());
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_clamps_past_last_page() {
        let rows: Vec<usize> = (1..=23).collect();
        let page = paginate(&rows, 15, 3);

        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.items, (16..=23).collect::<Vec<_>>());
        assert_eq!(page.first_row, 16);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_far_past_last_page_matches_last_page() {
        let rows: Vec<usize> = (0..47).collect();
        let last = paginate(&rows, 10, 5);
        let beyond = paginate(&rows, 10, 10);

        assert_eq!(last.total_pages, 5);
        assert_eq!(last, beyond);
    }

    #[test]
    fn test_clamps_page_zero_up() {
        let rows: Vec<usize> = (0..12).collect();
        let page = paginate(&rows, 10, 0);

        assert_eq!(page.current_page, 1);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.first_row, 1);
        assert!(!page.has_previous);
        assert!(page.has_next);
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let rows = vec!['a', 'b'];
        let page = paginate(&rows, 0, 2);

        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items, vec!['b']);
    }

    #[test]
    fn test_map_keeps_navigation() {
        let rows: Vec<usize> = (0..30).collect();
        let page = paginate(&rows, 15, 2).map(|n| n.to_string());

        assert_eq!(page.current_page, 2);
        assert_eq!(page.items.first().map(String::as_str), Some("15"));
    }
}
