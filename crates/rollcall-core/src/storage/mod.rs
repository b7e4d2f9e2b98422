//! Storage layer
//!
//! Persists the student and attendance collections as JSON arrays in a
//! key-value backend.
//!
//! ## Architecture
//!
//! - **Backend**: string values under string keys (files on disk, or memory)
//! - **Persistence**: whole-collection serialization on top of a backend
//!
//! Every mutation rewrites the affected collection in full.

pub mod backend;
pub mod error;
pub mod persistence;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::{StorageError, StorageResult};
pub use persistence::{RecordPersistence, RECORDS_KEY, STUDENTS_KEY};
