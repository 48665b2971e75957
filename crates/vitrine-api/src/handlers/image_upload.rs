use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use vitrine_core::UploadResult;

use crate::auth::Principal;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_upload_form;

/// Upload image handler
///
/// Parses the multipart form and runs it through the ingestion pipeline:
/// validation, SEO naming, WebP transcoding and the atomic write under the
/// public root. The returned `path` is directly servable.
///
/// # Errors
/// - `AppError::UnsupportedMediaType` - declared type outside the allow-list
/// - `AppError::PayloadTooLarge` - file exceeds the size limit
/// - `AppError::InvalidInput` - malformed form, empty file or invalid folder
/// - `AppError::ImageProcessing` / `Storage` / `Timeout` - opaque `Upload failed`
#[utoipa::path(
    post,
    path = "/api/v0/images",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: `file` (required), `folder`, `altText`"),
    responses(
        (status = 200, description = "Image optimized and stored", body = UploadResult),
        (status = 400, description = "Unsupported type or invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API token", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(principal = principal.name(), operation = "upload_image")
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    multipart: Multipart,
) -> Result<Json<UploadResult>, HttpAppError> {
    let settings = state.config.upload();
    let form = extract_upload_form(multipart, settings.max_file_size_bytes).await?;
    let request = form.into_request(&settings.default_folder);

    let result = state.pipeline.process(request).await?;

    Ok(Json(result))
}
