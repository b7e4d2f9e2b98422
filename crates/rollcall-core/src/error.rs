//! Domain errors
//!
//! Every variant except `Storage` is recovered where it is detected and shown
//! to the user as a message. Storage failures while loading at startup are
//! fatal.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by store, simulator and export operations
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// Registration with a student id that is already taken
    #[error("Student ID already exists: {0}")]
    DuplicateStudentId(String),

    /// Registration without one of the required fields
    #[error("Please fill all required fields (missing {0})")]
    MissingRequiredField(&'static str),

    /// The frame source could not be opened or read
    #[error("Could not access camera: {0}")]
    CameraUnavailable(String),

    /// Export matched nothing
    #[error("No records to export")]
    NoMatchingRecords,

    /// Manual marking for a student id that is not registered
    #[error("Unknown student: {0}")]
    UnknownStudent(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AttendanceError {
    /// Whether this should be reported as a warning rather than a failure
    pub fn is_warning(&self) -> bool {
        matches!(self, AttendanceError::NoMatchingRecords)
    }
}

/// Result type for domain operations
pub type AttendanceResult<T> = Result<T, AttendanceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_messages() {
        let err = AttendanceError::DuplicateStudentId("STU001".to_string());
        assert_eq!(err.to_string(), "Student ID already exists: STU001");

        let err = AttendanceError::MissingRequiredField("name");
        assert!(err.to_string().contains("missing name"));
    }

    #[test]
    fn test_only_empty_export_is_a_warning() {
        assert!(AttendanceError::NoMatchingRecords.is_warning());
        assert!(!AttendanceError::CameraUnavailable("busy".into()).is_warning());
    }

    #[test]
    fn test_storage_errors_convert() {
        let storage = StorageError::NotFound {
            path: PathBuf::from("/missing"),
        };
        let err: AttendanceError = storage.into();
        assert!(matches!(err, AttendanceError::Storage(_)));
        assert!(err.to_string().contains("/missing"));
    }
}
