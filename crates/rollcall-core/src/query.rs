//! Attendance filtering
//!
//! All criteria are optional and combined with AND. Filtering never reorders
//! or mutates the source collection.

use chrono::NaiveDate;

use crate::models::{AttendanceRecord, Department};

/// Filter criteria for attendance records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive lower date bound
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to_date: Option<NaiveDate>,
    /// Exact department match
    pub department: Option<Department>,
    /// Case-insensitive substring of the student id
    pub student_id: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }

    pub fn department(mut self, department: Department) -> Self {
        self.department = Some(department);
        self
    }

    pub fn student_id(mut self, fragment: impl Into<String>) -> Self {
        self.student_id = Some(fragment.into());
        self
    }

    /// The same criteria with the student-id constraint dropped
    pub fn without_student_id(&self) -> Self {
        Self {
            student_id: None,
            ..self.clone()
        }
    }

    /// True when no criterion constrains anything
    pub fn is_empty(&self) -> bool {
        self.from_date.is_none()
            && self.to_date.is_none()
            && self.department.is_none()
            && self.student_id_needle().is_none()
    }

    /// Check a single record against every criterion
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(from) = self.from_date {
            if record.date < from {
                return false;
            }
        }
        if let Some(to) = self.to_date {
            if record.date > to {
                return false;
            }
        }
        if let Some(department) = self.department {
            if record.department != department {
                return false;
            }
        }
        if let Some(needle) = self.student_id_needle() {
            if !record.student_id.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// Lowercased, trimmed student-id fragment; blank input means no constraint
    fn student_id_needle(&self) -> Option<String> {
        self.student_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Return the records matching `criteria`, in source order
pub fn filter_attendance(
    records: &[AttendanceRecord],
    criteria: &FilterCriteria,
) -> Vec<AttendanceRecord> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}
