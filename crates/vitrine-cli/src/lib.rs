//! Helpers for the `vitrine-optimize` command line tool

use anyhow::{Context, Result};
use std::path::Path;
use vitrine_core::{UploadRequest, UploadResult};

/// Media type for a file, derived from its extension
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Read a local file into a pipeline request.
///
/// Unknown extensions are sent as `application/octet-stream` so the
/// validation gate reports them the same way the HTTP endpoint does.
pub async fn load_request(path: &Path, folder: &str, alt_text: Option<&str>) -> Result<UploadRequest> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = content_type_for_path(path).unwrap_or("application/octet-stream");

    let mut request = UploadRequest::new(data, content_type, folder);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        request = request.with_original_filename(name);
    }
    if let Some(alt_text) = alt_text {
        request = request.with_alt_text(alt_text);
    }
    Ok(request)
}

/// Human-readable summary of an upload
pub fn format_result(result: &UploadResult) -> String {
    format!(
        "{}\n  original:  {} bytes\n  optimized: {} bytes ({}% saved)",
        result.path, result.original_size, result.optimized_size, result.compression_ratio
    )
}
