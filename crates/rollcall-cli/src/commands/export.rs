//! Export command handler

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use rollcall_core::export::{default_file_name, export, preview};
use rollcall_core::{AttendanceError, Department, ExportRequest, Store};

use crate::output::Output;

pub struct ExportArgs {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub department: Option<Department>,
    /// `-` writes to stdout
    pub path: Option<PathBuf>,
    pub preview: bool,
}

impl ExportArgs {
    fn request(&self, today: NaiveDate) -> ExportRequest {
        let defaults = ExportRequest::default_for(today);
        ExportRequest {
            from_date: self.from.unwrap_or(defaults.from_date),
            to_date: self.to.unwrap_or(defaults.to_date),
            department: self.department,
        }
    }
}

/// Write or preview a CSV export
pub fn run(store: &Store, args: ExportArgs, output: &Output) -> Result<()> {
    let today = Local::now().date_naive();
    let request = args.request(today);

    if args.preview {
        let rows = preview(store.records(), &request.criteria());
        if rows.is_empty() {
            output.warning(&AttendanceError::NoMatchingRecords.to_string());
        } else {
            output.print_records(&rows, 1);
        }
        return Ok(());
    }

    let csv = match export(store.records(), &request) {
        Ok(csv) => csv,
        Err(e) if e.is_warning() => {
            output.warning(&e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let path = args
        .path
        .unwrap_or_else(|| PathBuf::from(default_file_name(today)));

    if path == Path::new("-") {
        print!("{}", csv.content);
        return Ok(());
    }

    std::fs::write(&path, &csv.content)
        .with_context(|| format!("Failed to write export file: {:?}", path))?;
    output.success(&format!(
        "Exported {} record(s) to {}",
        csv.row_count,
        path.display()
    ));
    Ok(())
}
