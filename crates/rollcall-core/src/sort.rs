//! Record ordering
//!
//! Records are ordered by the stored text of one column. The sort is stable
//! in both directions: rows with equal keys keep their relative order.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::models::AttendanceRecord;

/// Column a record listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Row-number column; ordering by it leaves rows untouched
    #[default]
    None,
    StudentId,
    StudentName,
    Department,
    Date,
    Time,
    Status,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::None,
        SortColumn::StudentId,
        SortColumn::StudentName,
        SortColumn::Department,
        SortColumn::Date,
        SortColumn::Time,
        SortColumn::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::None => "none",
            SortColumn::StudentId => "student-id",
            SortColumn::StudentName => "name",
            SortColumn::Department => "department",
            SortColumn::Date => "date",
            SortColumn::Time => "time",
            SortColumn::Status => "status",
        }
    }

    /// Text of this column for `record`
    fn key<'a>(&self, record: &'a AttendanceRecord) -> Cow<'a, str> {
        match self {
            SortColumn::None => Cow::Borrowed(""),
            SortColumn::StudentId => Cow::Borrowed(&record.student_id),
            SortColumn::StudentName => Cow::Borrowed(&record.student_name),
            SortColumn::Department => Cow::Borrowed(record.department.as_str()),
            SortColumn::Date => Cow::Owned(record.date.format("%Y-%m-%d").to_string()),
            SortColumn::Time => Cow::Borrowed(&record.time),
            SortColumn::Status => Cow::Borrowed(record.status.as_str()),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "none" | "#" => Ok(SortColumn::None),
            "student-id" | "studentid" | "id" => Ok(SortColumn::StudentId),
            "name" | "student-name" | "studentname" => Ok(SortColumn::StudentName),
            "department" | "dept" => Ok(SortColumn::Department),
            "date" => Ok(SortColumn::Date),
            "time" => Ok(SortColumn::Time),
            "status" => Ok(SortColumn::Status),
            other => Err(format!(
                "Unknown sort column '{}'. Valid columns: none, student-id, name, department, date, time, status",
                other
            )),
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::None,
            ascending: true,
        }
    }
}

impl SortState {
    /// Select `column`: the active column flips direction, a new one starts ascending
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.ascending = !self.ascending;
        } else {
            self.column = column;
            self.ascending = true;
        }
    }

    /// Order `records` by this state
    pub fn apply(&self, records: &mut [AttendanceRecord]) {
        sort_records(records, self.column, self.ascending);
    }
}

/// Stable in-place sort by the text of `column`
pub fn sort_records(records: &mut [AttendanceRecord], column: SortColumn, ascending: bool) {
    if column == SortColumn::None {
        return;
    }

    records.sort_by(|a, b| {
        let ord = column.key(a).cmp(&column.key(b));
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}
