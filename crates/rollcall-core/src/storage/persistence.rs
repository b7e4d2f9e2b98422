//! Collection persistence
//!
//! Both collections are serialized as whole JSON arrays and written under
//! fixed keys on every mutation. There is no append log and no versioning:
//! a write replaces the previous array entirely.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::KeyValueBackend;
use super::error::{StorageError, StorageResult};
use crate::models::{AttendanceRecord, Student};

/// Storage key for the student collection
pub const STUDENTS_KEY: &str = "faceAttendanceStudents";

/// Storage key for the attendance collection
pub const RECORDS_KEY: &str = "faceAttendanceRecords";

/// Serializes the two collections into a key-value backend
pub struct RecordPersistence {
    backend: Box<dyn KeyValueBackend>,
}

impl RecordPersistence {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Load both collections. Missing keys yield empty collections.
    pub fn load_all(&self) -> StorageResult<(Vec<Student>, Vec<AttendanceRecord>)> {
        let students = self.load_collection(STUDENTS_KEY)?;
        let records = self.load_collection(RECORDS_KEY)?;
        Ok((students, records))
    }

    pub fn save_students(&mut self, students: &[Student]) -> StorageResult<()> {
        self.save_collection(STUDENTS_KEY, students)
    }

    pub fn save_records(&mut self, records: &[AttendanceRecord]) -> StorageResult<()> {
        self.save_collection(RECORDS_KEY, records)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Vec<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|e| StorageError::InvalidFormat {
            key: key.to_string(),
            details: e.to_string(),
        })
    }

    fn save_collection<T: Serialize>(&mut self, key: &str, items: &[T]) -> StorageResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &raw)
    }
}
