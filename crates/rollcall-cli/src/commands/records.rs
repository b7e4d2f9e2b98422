//! Records browsing command

use anyhow::Result;
use chrono::NaiveDate;

use rollcall_core::{Department, FilterCriteria, SortColumn, SortState, Store, ViewState};

use crate::output::Output;

pub struct RecordsArgs {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub department: Option<Department>,
    pub student: Option<String>,
    pub sort: Option<SortColumn>,
    pub desc: bool,
    pub page: usize,
}

impl RecordsArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            from_date: self.from,
            to_date: self.to,
            department: self.department,
            student_id: self.student.clone(),
        }
    }

    fn view(&self, page_size: usize) -> ViewState {
        let mut view = ViewState::new(page_size);
        view.apply_filters(self.criteria());
        if let Some(column) = self.sort {
            view.sort = SortState {
                column,
                ascending: !self.desc,
            };
        }
        view.page_number = self.page;
        view
    }
}

/// Show one page of filtered, sorted records
pub fn list(store: &Store, args: RecordsArgs, output: &Output) -> Result<()> {
    let view = args.view(store.config().page_size);
    let page = view.current_page(store);

    if page.items.is_empty() && page.total_items > 0 {
        output.warning(&format!(
            "Page {} is out of range (1-{})",
            page.page_number, page.total_pages
        ));
    }
    output.print_page(&page, view.page_size);
    Ok(())
}
