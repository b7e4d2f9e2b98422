//! CSV export
//!
//! Exports cover the whole attendance collection narrowed by date range and
//! department. The student-id filter used for browsing never applies here.
//!
//! Rows follow the layout older exports used: the name column is always
//! quoted, every other column is written bare unless it contains a
//! delimiter, quote, or line break.

use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{AttendanceRecord, Department};
use crate::query::{filter_attendance, FilterCriteria};

pub const CSV_HEADER: &str = "Student ID,Name,Department,Date,Time,Status";

/// Number of rows shown by `preview`
pub const PREVIEW_LIMIT: usize = 10;

/// Length of the default export window, in days before today
const DEFAULT_RANGE_DAYS: i64 = 30;

/// What to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub department: Option<Department>,
}

impl ExportRequest {
    /// Last 30 days through `today`, all departments
    pub fn default_for(today: NaiveDate) -> Self {
        let (from_date, to_date) = default_range(today);
        Self {
            from_date,
            to_date,
            department: None,
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            from_date: Some(self.from_date),
            to_date: Some(self.to_date),
            department: self.department,
            student_id: None,
        }
    }
}

/// A rendered export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub content: String,
    pub row_count: usize,
}

/// `(today - 30 days, today)`
pub fn default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = today
        .checked_sub_signed(Duration::days(DEFAULT_RANGE_DAYS))
        .unwrap_or(NaiveDate::MIN);
    (from, today)
}

/// `attendance_<YYYY-MM-DD>.csv`
pub fn default_file_name(today: NaiveDate) -> String {
    format!("attendance_{}.csv", today.format("%Y-%m-%d"))
}

/// Render matching records as CSV. Only the header when nothing matches.
pub fn export_csv(records: &[AttendanceRecord], criteria: &FilterCriteria) -> String {
    let rows = filter_attendance(records, &criteria.without_student_id());

    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in &rows {
        out.push_str(&csv_row(record));
        out.push('\n');
    }
    out
}

/// Render an export, refusing to produce one with no rows
pub fn export(records: &[AttendanceRecord], request: &ExportRequest) -> AttendanceResult<CsvExport> {
    let criteria = request.criteria();
    let row_count = records.iter().filter(|r| criteria.matches(r)).count();
    if row_count == 0 {
        return Err(AttendanceError::NoMatchingRecords);
    }

    let content = export_csv(records, &criteria);
    info!(
        "Exported {} records ({} to {})",
        row_count, request.from_date, request.to_date
    );
    Ok(CsvExport { content, row_count })
}

/// First rows an export would contain
pub fn preview(records: &[AttendanceRecord], criteria: &FilterCriteria) -> Vec<AttendanceRecord> {
    let criteria = criteria.without_student_id();
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .take(PREVIEW_LIMIT)
        .cloned()
        .collect()
}

fn csv_row(record: &AttendanceRecord) -> String {
    format!(
        "{},{},{},{},{},{}",
        csv_field(&record.student_id),
        quote(&record.student_name),
        csv_field(record.department.as_str()),
        record.date.format("%Y-%m-%d"),
        csv_field(&record.time),
        record.status.as_str()
    )
}

/// Quote a field only when it needs it
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
