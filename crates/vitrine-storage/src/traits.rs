//! Storage abstraction trait

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid folder: {0}")]
    InvalidFolder(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A file persisted under the public root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Normalized folder, relative to the public root
    pub folder: String,
    pub file_name: String,
    /// Absolute (or root-relative, if the root is relative) on-disk location
    pub disk_path: PathBuf,
    pub size_bytes: u64,
}

impl StoredFile {
    /// Path relative to the public root, always `/`-separated
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.folder, self.file_name)
    }
}

/// Storage abstraction trait
///
/// The pipeline only depends on this trait, so tests and alternative hosts can
/// swap the filesystem writer for another backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` as `<folder>/<file_name>`.
    ///
    /// The destination folder is created when missing. The write is published
    /// atomically: readers see either nothing or the complete file. An existing
    /// file with the same name is never replaced.
    async fn write(&self, folder: &str, file_name: &str, data: &[u8]) -> StorageResult<StoredFile>;

    /// Verify the root is writable (used by health checks)
    async fn health_check(&self) -> StorageResult<()>;
}
