//! Student command handlers

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

use rollcall_core::{
    capture_face_reference, Department, FileFrameSource, Store, StudentRegistration,
};

use crate::output::Output;

pub struct RegisterArgs {
    pub student_id: String,
    pub name: String,
    pub department: Department,
    pub email: Option<String>,
    pub photo: PathBuf,
}

/// Capture the face reference and register a student
pub fn register(store: &mut Store, args: RegisterArgs, output: &Output) -> Result<()> {
    let mut source = FileFrameSource::new(args.photo);
    let face_data = capture_face_reference(&mut source)?;

    let registration = StudentRegistration {
        student_id: args.student_id,
        name: args.name,
        department: Some(args.department),
        email: args.email,
        face_data: Some(face_data),
    };

    let student = store.register_student(registration, Local::now().date_naive())?;
    output.print_student(&student);
    Ok(())
}

/// List all registered students
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_students(store.students());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use rollcall_core::AttendanceError;
    use tempfile::TempDir;

    fn args(dir: &TempDir, id: &str) -> RegisterArgs {
        let photo = dir.path().join("face.png");
        std::fs::write(&photo, b"\x89PNG").unwrap();
        RegisterArgs {
            student_id: id.to_string(),
            name: "Rahul Kumar".to_string(),
            department: Department::Cse,
            email: Some("rahul@example.com".to_string()),
            photo,
        }
    }

    #[test]
    fn test_register_stores_face_reference() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::in_memory();
        let output = Output::new(OutputFormat::Quiet);

        register(&mut store, args(&dir, "STU001"), &output).unwrap();

        let student = store.find_student("STU001").unwrap();
        assert!(student.face_data.starts_with("data:image/png;base64,"));
        assert_eq!(student.email.as_deref(), Some("rahul@example.com"));
    }

    #[test]
    fn test_register_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::in_memory();
        let output = Output::new(OutputFormat::Quiet);

        register(&mut store, args(&dir, "STU001"), &output).unwrap();
        let err = register(&mut store, args(&dir, "STU001"), &output).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AttendanceError>(),
            Some(AttendanceError::DuplicateStudentId(_))
        ));
    }

    #[test]
    fn test_register_without_photo_file() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::in_memory();
        let output = Output::new(OutputFormat::Quiet);

        let mut a = args(&dir, "STU001");
        a.photo = dir.path().join("missing.jpg");
        let err = register(&mut store, a, &output).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AttendanceError>(),
            Some(AttendanceError::CameraUnavailable(_))
        ));
        assert_eq!(store.student_count(), 0);
    }
}
