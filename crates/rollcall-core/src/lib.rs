//! rollcall-core: attendance tracking library
//!
//! Keeps a roster of students and their attendance marks in a small JSON
//! key-value store, and provides the operations the CLI is built from:
//!
//! - [`Store`]: load, register, mark, persist
//! - [`filter_attendance`], [`sort_records`], [`page`]: browse records
//! - [`Simulator`]: random stand-in for face recognition
//! - [`export::export_csv`]: CSV reports
//! - [`FrameSource`]: face reference capture for registration

pub mod camera;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod models;
pub mod paginate;
pub mod query;
pub mod simulator;
pub mod sort;
pub mod storage;
pub mod store;
pub mod view;

pub use camera::{capture_face_reference, CapturedFrame, FileFrameSource, FrameSource};
pub use config::{Config, SimulatorConfig};
pub use dashboard::DashboardStats;
pub use error::{AttendanceError, AttendanceResult};
pub use export::{CsvExport, ExportRequest};
pub use models::{AttendanceRecord, AttendanceStatus, Department, Student, StudentRegistration};
pub use paginate::{page, Page, PAGE_SIZE};
pub use query::{filter_attendance, FilterCriteria};
pub use simulator::{run_session, Randomness, Simulator, SimulatorEvent, SimulatorState, ThreadRandomness};
pub use sort::{sort_records, SortColumn, SortState};
pub use storage::{StorageError, StorageResult};
pub use store::Store;
pub use view::ViewState;
