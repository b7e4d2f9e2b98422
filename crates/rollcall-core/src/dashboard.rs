//! Summary counts shown on the dashboard

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AttendanceRecord, AttendanceStatus, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_students: usize,
    /// Records dated today
    pub today_attendance: usize,
    /// Share of all records that are Present, rounded to a whole percent
    pub attendance_percentage: u32,
}

impl DashboardStats {
    pub fn compute(students: &[Student], records: &[AttendanceRecord], today: NaiveDate) -> Self {
        let today_attendance = records.iter().filter(|r| r.date == today).count();
        let present = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();

        let attendance_percentage = if records.is_empty() {
            0
        } else {
            (present as f64 / records.len() as f64 * 100.0).round() as u32
        };

        Self {
            total_students: students.len(),
            today_attendance,
            attendance_percentage,
        }
    }
}
