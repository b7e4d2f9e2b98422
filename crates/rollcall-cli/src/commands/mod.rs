//! Command handlers

pub mod attendance;
pub mod config;
pub mod export;
pub mod records;
pub mod status;
pub mod student;
