//! Record browsing state
//!
//! Holds the current filter, sort and page for a records listing. Each page
//! is recomputed from the live store as filter, then sort, then page, so
//! moving between pages never loses the active sort.

use crate::models::AttendanceRecord;
use crate::paginate::{page, total_pages, Page, PAGE_SIZE};
use crate::query::{filter_attendance, FilterCriteria};
use crate::sort::{SortColumn, SortState};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub criteria: FilterCriteria,
    pub sort: SortState,
    pub page_number: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort: SortState::default(),
            page_number: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.page_number = 1;
    }

    pub fn clear_filters(&mut self) {
        self.apply_filters(FilterCriteria::default());
    }

    /// Sort on `column`, flipping direction if it is already active
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.toggle(column);
        self.page_number = 1;
    }

    /// Advance one page if there is one. Returns whether the page changed.
    pub fn next_page(&mut self, store: &Store) -> bool {
        let count = self.visible(store).len();
        if self.page_number < total_pages(count, self.page_size) {
            self.page_number += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page unless already on the first
    pub fn previous_page(&mut self) -> bool {
        if self.page_number > 1 {
            self.page_number -= 1;
            true
        } else {
            false
        }
    }

    /// Filtered and sorted records, before paging
    pub fn visible(&self, store: &Store) -> Vec<AttendanceRecord> {
        let mut records = filter_attendance(store.records(), &self.criteria);
        self.sort.apply(&mut records);
        records
    }

    pub fn current_page(&self, store: &Store) -> Page<AttendanceRecord> {
        page(&self.visible(store), self.page_number, self.page_size)
    }
}
