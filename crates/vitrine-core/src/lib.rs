//! Vitrine Core Library
//!
//! This crate provides the configuration, error types and upload models
//! shared by the storage, processing, API and CLI crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, UploadSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{UploadRequest, UploadResult};
