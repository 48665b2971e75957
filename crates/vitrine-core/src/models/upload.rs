use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single image submitted for ingestion.
///
/// Built by the caller (HTTP handler or CLI) for one pipeline run and
/// dropped afterwards.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub data: Vec<u8>,
    /// MIME type as declared by the client; not trusted for decoding
    pub content_type: String,
    /// Destination folder under the public root, used as a relative subpath
    pub folder: String,
    /// Descriptive text used to derive the SEO filename
    pub alt_text: Option<String>,
    pub original_filename: Option<String>,
}

impl UploadRequest {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            folder: folder.into(),
            alt_text: None,
            original_filename: None,
        }
    }

    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }

    pub fn with_original_filename(mut self, filename: impl Into<String>) -> Self {
        self.original_filename = Some(filename.into());
        self
    }

    /// Declared payload length in bytes
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }
}

/// Successful upload response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    /// Public URL path at which the asset is served, e.g. `/blog/photo-1700000000000.webp`
    pub path: String,
    pub file_name: String,
    pub original_size: u64,
    pub optimized_size: u64,
    /// `round((1 - optimized / original) * 100)`; negative when the output grew
    pub compression_ratio: i64,
}
