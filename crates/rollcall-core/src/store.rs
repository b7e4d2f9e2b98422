//! Record store
//!
//! The `Store` owns the two in-memory collections and writes the affected
//! collection back through `RecordPersistence` after every mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! store.register_student(registration, today)?;
//! store.mark_present("STU001", now)?;
//!
//! let todays = store.records_on(today);
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::config::Config;
use crate::dashboard::DashboardStats;
use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{AttendanceRecord, Department, Student, StudentRegistration};
use crate::storage::{FileBackend, KeyValueBackend, MemoryBackend, RecordPersistence, StorageResult};

/// Students and attendance records, kept in sync with storage
pub struct Store {
    students: Vec<Student>,
    records: Vec<AttendanceRecord>,
    persistence: RecordPersistence,
    config: Config,
}

impl Store {
    /// Open the store at the configured data directory
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// Both collections are loaded up front. Unreadable or malformed data is
    /// an error here rather than being replaced with empty collections.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let backend = FileBackend::new(&config.data_dir);
        let mut store = Self::with_backend(backend)
            .with_context(|| format!("Failed to load records from {:?}", config.data_dir))?;
        store.config = config;
        Ok(store)
    }

    /// Load from an arbitrary backend with default configuration
    pub fn with_backend(backend: impl KeyValueBackend + 'static) -> StorageResult<Self> {
        let persistence = RecordPersistence::new(backend);
        let (students, records) = persistence.load_all()?;
        info!(
            "Loaded {} students and {} attendance records",
            students.len(),
            records.len()
        );

        Ok(Self {
            students,
            records,
            persistence,
            config: Config::default(),
        })
    }

    /// Empty store backed by memory only
    pub fn in_memory() -> Self {
        Self {
            students: Vec::new(),
            records: Vec::new(),
            persistence: RecordPersistence::new(MemoryBackend::new()),
            config: Config::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Students ====================

    /// Registered students in registration order
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Look up a student by exact student id
    pub fn find_student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    /// Append a student and persist the collection
    ///
    /// Student ids are compared exactly. If the write fails the student is
    /// removed again so memory keeps matching storage.
    pub fn add_student(&mut self, student: Student) -> AttendanceResult<()> {
        if self.find_student(&student.student_id).is_some() {
            return Err(AttendanceError::DuplicateStudentId(student.student_id));
        }

        let student_id = student.student_id.clone();
        self.students.push(student);
        if let Err(e) = self.persistence.save_students(&self.students) {
            self.students.pop();
            return Err(e.into());
        }

        info!("Registered student {}", student_id);
        Ok(())
    }

    /// Validate a registration form and add the resulting student
    pub fn register_student(
        &mut self,
        registration: StudentRegistration,
        today: NaiveDate,
    ) -> AttendanceResult<Student> {
        let student = registration.into_student(today)?;
        self.add_student(student.clone())?;
        Ok(student)
    }

    // ==================== Attendance ====================

    /// All records in insertion order
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Records dated `date`, in insertion order
    pub fn records_on(&self, date: NaiveDate) -> Vec<&AttendanceRecord> {
        self.records.iter().filter(|r| r.date == date).collect()
    }

    /// Append a record and persist the collection
    ///
    /// There is no duplicate check: the same student may be marked any number
    /// of times on the same day.
    pub fn add_attendance_record(&mut self, record: AttendanceRecord) -> AttendanceResult<()> {
        self.records.push(record);
        if let Err(e) = self.persistence.save_records(&self.records) {
            self.records.pop();
            return Err(e.into());
        }

        if let Some(record) = self.records.last() {
            debug!(
                "Marked {} ({}) present at {} {}",
                record.student_id, record.department, record.date, record.time
            );
        }
        Ok(())
    }

    /// Mark a registered student present at `at`
    pub fn mark_present(
        &mut self,
        student_id: &str,
        at: NaiveDateTime,
    ) -> AttendanceResult<AttendanceRecord> {
        let student = self
            .find_student(student_id)
            .ok_or_else(|| AttendanceError::UnknownStudent(student_id.to_string()))?;
        let record = AttendanceRecord::present(student, at);
        self.add_attendance_record(record.clone())?;
        Ok(record)
    }

    /// Mark a student present using an explicit name and department
    ///
    /// Used when the student id is not registered; the record still carries
    /// a full snapshot so listings and exports stay complete.
    pub fn mark_present_as(
        &mut self,
        student_id: &str,
        name: &str,
        department: Department,
        at: NaiveDateTime,
    ) -> AttendanceResult<AttendanceRecord> {
        let snapshot = Student::new(student_id, name, department, at.date(), String::new());
        let record = AttendanceRecord::present(&snapshot, at);
        self.add_attendance_record(record.clone())?;
        Ok(record)
    }

    /// Dashboard counts as of `today`
    pub fn dashboard(&self, today: NaiveDate) -> DashboardStats {
        DashboardStats::compute(&self.students, &self.records, today)
    }
}
