//! Data models for rollcall
//!
//! Defines the two persisted entities, `Student` and `AttendanceRecord`,
//! plus the enumerations they carry. Field names serialize in camelCase so
//! stored collections keep the layout older data was written with.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AttendanceError, AttendanceResult};

/// Departments a student can be registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "ECE")]
    Ece,
    #[serde(rename = "EEE")]
    Eee,
    #[serde(rename = "ME")]
    Me,
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "IT")]
    It,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Cse,
        Department::Ece,
        Department::Eee,
        Department::Me,
        Department::Ce,
        Department::It,
    ];

    /// Short code as stored and exported
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Cse => "CSE",
            Department::Ece => "ECE",
            Department::Eee => "EEE",
            Department::Me => "ME",
            Department::Ce => "CE",
            Department::It => "IT",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let valid: Vec<_> = Department::ALL.iter().map(|d| d.as_str()).collect();
                format!(
                    "Unknown department '{}'. Valid departments: {}",
                    wanted,
                    valid.join(", ")
                )
            })
    }
}

/// Attendance status of a record. Only `Present` is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A registered student
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Internal identifier, generated at registration
    pub id: String,
    /// User-supplied identifier (e.g. "STU001"), unique across students
    pub student_id: String,
    /// Display name
    pub name: String,
    pub department: Department,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub registered_date: NaiveDate,
    /// Opaque face reference captured at registration (a data URL)
    pub face_data: String,
}

impl Student {
    /// Create a student with a freshly generated internal id
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        department: Department,
        registered_date: NaiveDate,
        face_data: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.into(),
            name: name.into(),
            department,
            email: None,
            registered_date,
            face_data: face_data.into(),
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|e| !e.trim().is_empty());
        self
    }
}

/// One attendance mark.
///
/// `student_name` and `department` are copied from the student when the mark
/// is made and are never refreshed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: String,
    pub student_name: String,
    pub department: Department,
    pub date: NaiveDate,
    /// 12-hour clock, e.g. "09:15 AM"
    pub time: String,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Mark `student` present at the given local instant
    pub fn present(student: &Student, at: NaiveDateTime) -> Self {
        Self {
            student_id: student.student_id.clone(),
            student_name: student.name.clone(),
            department: student.department,
            date: at.date(),
            time: format_clock_time(at.time()),
            status: AttendanceStatus::Present,
        }
    }
}

/// Format a time of day as a zero-padded 12-hour clock ("01:05 PM")
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

/// Input collected by the registration form
#[derive(Debug, Clone, Default)]
pub struct StudentRegistration {
    pub student_id: String,
    pub name: String,
    pub department: Option<Department>,
    pub email: Option<String>,
    /// Face reference produced by a frame source
    pub face_data: Option<String>,
}

impl StudentRegistration {
    /// Check required fields and build the student.
    ///
    /// Student id and name are trimmed before use.
    pub fn into_student(self, registered_date: NaiveDate) -> AttendanceResult<Student> {
        let student_id = self.student_id.trim();
        let name = self.name.trim();

        if student_id.is_empty() {
            return Err(AttendanceError::MissingRequiredField("student id"));
        }
        if name.is_empty() {
            return Err(AttendanceError::MissingRequiredField("name"));
        }
        let department = self
            .department
            .ok_or(AttendanceError::MissingRequiredField("department"))?;
        let face_data = self
            .face_data
            .filter(|f| !f.is_empty())
            .ok_or(AttendanceError::MissingRequiredField("photo"))?;

        let email = self.email.map(|e| e.trim().to_string());

        Ok(
            Student::new(student_id, name, department, registered_date, face_data)
                .with_email(email),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn registration() -> StudentRegistration {
        StudentRegistration {
            student_id: " STU001 ".to_string(),
            name: "Rahul Kumar".to_string(),
            department: Some(Department::Cse),
            email: Some("".to_string()),
            face_data: Some("data:image/png;base64,AAAA".to_string()),
        }
    }

    #[test]
    fn test_department_parse_is_case_insensitive() {
        assert_eq!("cse".parse::<Department>().unwrap(), Department::Cse);
        assert_eq!(" ECE ".parse::<Department>().unwrap(), Department::Ece);
        let err = "BIO".parse::<Department>().unwrap_err();
        assert!(err.contains("Valid departments"));
    }

    #[test]
    fn test_display_pads_to_column_width() {
        assert_eq!(format!("{:<6}", Department::Cse), "CSE   ");
        assert_eq!(format!("[{:>6}]", Department::It), "[    IT]");
        assert_eq!(format!("{:<10}|", AttendanceStatus::Present), "Present   |");
        assert_eq!(Department::Eee.to_string(), "EEE");
    }

    #[test]
    fn test_clock_time_format() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(format_clock_time(t(9, 5)), "09:05 AM");
        assert_eq!(format_clock_time(t(0, 30)), "12:30 AM");
        assert_eq!(format_clock_time(t(12, 0)), "12:00 PM");
        assert_eq!(format_clock_time(t(23, 59)), "11:59 PM");
    }

    #[test]
    fn test_present_record_snapshots_student() {
        let student = Student::new("STU002", "Priya Sharma", Department::Ece, date("2025-11-01"), "x");
        let at = date("2025-11-03").and_hms_opt(9, 18, 0).unwrap();

        let record = AttendanceRecord::present(&student, at);
        assert_eq!(record.student_id, "STU002");
        assert_eq!(record.student_name, "Priya Sharma");
        assert_eq!(record.department, Department::Ece);
        assert_eq!(record.date, date("2025-11-03"));
        assert_eq!(record.time, "09:18 AM");
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[test]
    fn test_record_json_layout() {
        let json = r#"{"studentId":"STU001","studentName":"Rahul Kumar","department":"CSE","date":"2025-11-03","time":"09:15 AM","status":"Present"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.department, Department::Cse);
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn test_student_json_accepts_legacy_ids_and_blank_email() {
        let json = r#"{"id":"id_k3j9x0a1b","studentId":"STU003","name":"Amit Patel","department":"CSE","email":"","registeredDate":"2025-11-02","faceData":"demo-face-3"}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.id, "id_k3j9x0a1b");
        assert_eq!(student.registered_date, date("2025-11-02"));
    }

    #[test]
    fn test_registration_builds_student() {
        let student = registration().into_student(date("2025-11-01")).unwrap();
        assert_eq!(student.student_id, "STU001");
        assert_eq!(student.email, None);
        assert_eq!(student.registered_date, date("2025-11-01"));
        assert!(!student.id.is_empty());
    }

    #[test]
    fn test_registration_requires_fields() {
        let today = date("2025-11-01");

        let mut reg = registration();
        reg.student_id = "   ".to_string();
        assert!(matches!(
            reg.into_student(today),
            Err(AttendanceError::MissingRequiredField("student id"))
        ));

        let mut reg = registration();
        reg.name = String::new();
        assert!(matches!(
            reg.into_student(today),
            Err(AttendanceError::MissingRequiredField("name"))
        ));

        let mut reg = registration();
        reg.department = None;
        assert!(matches!(
            reg.into_student(today),
            Err(AttendanceError::MissingRequiredField("department"))
        ));

        let mut reg = registration();
        reg.face_data = None;
        assert!(matches!(
            reg.into_student(today),
            Err(AttendanceError::MissingRequiredField("photo"))
        ));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let today = date("2025-11-01");
        let a = Student::new("A", "A", Department::It, today, "x");
        let b = Student::new("B", "B", Department::It, today, "x");
        assert_ne!(a.id, b.id);
    }
}
