use crate::keys::{normalize_folder, validate_file_name};
use crate::traits::{Storage, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage rooted at the public static-serving directory
#[derive(Clone, Debug)]
pub struct LocalStorage {
    public_root: PathBuf,
}

/// Removes a temporary file when dropped unless disarmed.
///
/// Covers both error returns and cancellation: a dropped `write` future drops
/// the guard, so no partial file is left next to the published assets.
struct TempFileGuard {
    path: Option<PathBuf>,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn disarm(&mut self) {
        self.path = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Removed partial upload file");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove partial upload file"
                    );
                }
            }
        }
    }
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `public_root` - Directory served as the site's static root (e.g., "public")
    pub async fn new(public_root: impl Into<PathBuf>) -> StorageResult<Self> {
        let public_root = public_root.into();

        fs::create_dir_all(&public_root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create public root {}: {}",
                public_root.display(),
                e
            ))
        })?;

        Ok(LocalStorage { public_root })
    }

    /// Create the destination directory (and parents).
    ///
    /// Concurrent callers may race on the same folder; "already exists" counts
    /// as success as long as the path really is a directory.
    async fn ensure_dir(&self, dir: &Path) -> StorageResult<()> {
        match fs::create_dir_all(dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
            Err(e) => Err(StorageError::WriteFailed(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn write(&self, folder: &str, file_name: &str, data: &[u8]) -> StorageResult<StoredFile> {
        let folder = normalize_folder(folder)?;
        validate_file_name(file_name)?;

        let dir = self.public_root.join(&folder);
        self.ensure_dir(&dir).await?;

        let final_path = dir.join(file_name);
        let start = std::time::Instant::now();
        let temp_path = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));
        let mut guard = TempFileGuard::new(temp_path.clone());

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to sync file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        drop(file);

        // Fails atomically when the target exists
        fs::hard_link(&temp_path, &final_path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    StorageError::AlreadyExists(final_path.display().to_string())
                }
                _ => StorageError::WriteFailed(format!(
                    "Failed to publish {} as {}: {}",
                    temp_path.display(),
                    final_path.display(),
                    e
                )),
            })?;

        if let Err(e) = fs::remove_file(&temp_path).await {
            tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "Failed to remove temporary upload file"
            );
        } else {
            guard.disarm();
        }

        tracing::info!(
            path = %final_path.display(),
            folder = %folder,
            file_name = %file_name,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(StoredFile {
            folder,
            file_name: file_name.to_string(),
            disk_path: final_path,
            size_bytes: data.len() as u64,
        })
    }

    async fn health_check(&self) -> StorageResult<()> {
        let probe = self
            .public_root
            .join(format!(".health-{}.tmp", Uuid::new_v4().simple()));
        let _guard = TempFileGuard::new(probe.clone());
        fs::write(&probe, b"ok").await?;
        Ok(())
    }
}
