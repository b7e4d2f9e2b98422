//! Fixed-size paging over an ordered sequence

use serde::Serialize;

/// Default rows per page
pub const PAGE_SIZE: usize = 20;

/// One page of a larger sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested
    pub page_number: usize,
    /// Always at least 1, even for an empty sequence
    pub total_pages: usize,
    /// Length of the whole sequence
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// 1-based position of the first item within the whole sequence
    pub fn first_index(&self, page_size: usize) -> usize {
        self.page_number.saturating_sub(1) * page_size.max(1) + 1
    }
}

/// Number of pages needed for `count` items
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice out page `page_number` (1-based).
///
/// Page numbers outside `1..=total_pages` give an empty page rather than
/// being clamped.
pub fn page<T: Clone>(records: &[T], page_number: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(records.len(), page_size);

    let items = if page_number == 0 {
        Vec::new()
    } else {
        records
            .iter()
            .skip((page_number - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    };

    Page {
        items,
        page_number,
        total_pages,
        total_items: records.len(),
    }
}
