//! Upload pipeline: validate, name, transcode, store, compose
//!
//! One `process` call handles one upload. Transcoding runs on the blocking
//! pool behind a semaphore so concurrent uploads cannot starve the runtime.
//! Transcoding and the storage write share a single deadline; a request that
//! misses it fails with `TimedOut` and leaves no file behind.

use crate::slug::{generate_file_name, seo_slug};
use crate::transcode::{compression_ratio, EncodeOptions, EncodedAsset, ImageEncoder, ProcessingError};
use crate::validator::{UploadValidator, ValidationError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use vitrine_core::{UploadRequest, UploadResult, UploadSettings};
use vitrine_storage::{normalize_folder, Storage, StorageError, StoredFile};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid folder: {0}")]
    InvalidFolder(String),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Upload timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Encoding task failed: {0}")]
    TaskFailed(String),
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFolder(msg) => UploadError::InvalidFolder(msg),
            other => UploadError::Storage(other),
        }
    }
}

/// Build the response for a stored asset
pub fn compose(stored: &StoredFile, original_size: u64, optimized_size: u64) -> UploadResult {
    UploadResult {
        success: true,
        path: format!("/{}", stored.relative_path()),
        file_name: stored.file_name.clone(),
        original_size,
        optimized_size,
        compression_ratio: compression_ratio(original_size, optimized_size),
    }
}

/// Image ingestion pipeline
#[derive(Clone)]
pub struct UploadPipeline {
    storage: Arc<dyn Storage>,
    validator: UploadValidator,
    encoder: Arc<ImageEncoder>,
    encode_permits: Arc<Semaphore>,
    timeout: Duration,
}

impl UploadPipeline {
    pub fn new(storage: Arc<dyn Storage>, settings: &UploadSettings) -> Self {
        Self {
            storage,
            validator: UploadValidator::new(settings.max_file_size_bytes),
            encoder: Arc::new(ImageEncoder::new(EncodeOptions::from(settings))),
            encode_permits: Arc::new(Semaphore::new(settings.max_concurrent_encodes.max(1))),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Override the encode + write deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one upload through the pipeline.
    ///
    /// Nothing is written unless validation and transcoding both succeed.
    #[tracing::instrument(
        skip(self, request),
        fields(
            content_type = %request.content_type,
            folder = %request.folder,
            size_bytes = request.byte_length()
        )
    )]
    pub async fn process(&self, request: UploadRequest) -> Result<UploadResult, UploadError> {
        let start = Instant::now();

        self.validator
            .validate(&request.content_type, request.byte_length())?;
        let folder = normalize_folder(&request.folder)?;
        let slug = seo_slug(
            request.alt_text.as_deref(),
            request.original_filename.as_deref(),
        );

        let (stored, asset) = tokio::time::timeout(
            self.timeout,
            self.encode_and_store(request.data, &folder, &slug),
        )
        .await
        .map_err(|_| UploadError::TimedOut(self.timeout))??;

        let result = compose(&stored, asset.original_size, asset.optimized_size());

        tracing::info!(
            path = %result.path,
            width = asset.width,
            height = asset.height,
            original_size = result.original_size,
            optimized_size = result.optimized_size,
            compression_ratio = result.compression_ratio,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image uploaded"
        );

        Ok(result)
    }

    async fn encode_and_store(
        &self,
        data: Vec<u8>,
        folder: &str,
        slug: &str,
    ) -> Result<(StoredFile, EncodedAsset), UploadError> {
        let asset = self.encode(data).await?;

        let file_name = generate_file_name(slug, chrono::Utc::now().timestamp_millis());
        let stored = self.storage.write(folder, &file_name, &asset.data).await?;

        Ok((stored, asset))
    }

    async fn encode(&self, data: Vec<u8>) -> Result<EncodedAsset, UploadError> {
        let permit = self
            .encode_permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| UploadError::TaskFailed(e.to_string()))?;
        let encoder = self.encoder.clone();

        let asset = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            encoder.encode(&data)
        })
        .await
        .map_err(|e| UploadError::TaskFailed(e.to_string()))??;

        Ok(asset)
    }
}
