//! Multipart parsing for the image upload form

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use validator::Validate;
use vitrine_core::{AppError, UploadRequest};

pub const FILE_FIELD: &str = "file";
pub const FOLDER_FIELD: &str = "folder";
pub const ALT_TEXT_FIELD: &str = "altText";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Parsed `multipart/form-data` upload
#[derive(Debug, Validate)]
pub struct UploadForm {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
    #[validate(length(min = 1, max = 128, message = "folder must be 1 to 128 characters"))]
    pub folder: Option<String>,
    #[validate(length(max = 300, message = "altText must be at most 300 characters"))]
    pub alt_text: Option<String>,
}

impl UploadForm {
    /// Build the pipeline request, falling back to `default_folder`
    pub fn into_request(self, default_folder: &str) -> UploadRequest {
        let folder = self
            .folder
            .unwrap_or_else(|| default_folder.to_string());

        let mut request = UploadRequest::new(self.data, self.content_type, folder);
        if let Some(alt_text) = self.alt_text {
            request = request.with_alt_text(alt_text);
        }
        if let Some(file_name) = self.file_name {
            request = request.with_original_filename(file_name);
        }
        request
    }
}

fn multipart_error(e: MultipartError, max_file_size: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Request body exceeds maximum allowed file size of {} MB",
            max_file_size / (1024 * 1024)
        ))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Read a text field; blank values count as absent
async fn read_text(field: Field<'_>, max_file_size: usize) -> Result<Option<String>, AppError> {
    let value = field
        .text()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?;
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.to_string()))
    }
}

/// Extract the upload form.
///
/// Accepts exactly one `file` field plus optional `folder` and `altText`.
/// Unknown or repeated fields are rejected. `max_file_size` only feeds the
/// message of a body-limit rejection; the size check itself is the pipeline's.
pub async fn extract_upload_form(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<UploadForm, AppError> {
    let mut file: Option<(Vec<u8>, String, Option<String>)> = None;
    let mut folder: Option<Option<String>> = None;
    let mut alt_text: Option<Option<String>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FILE_FIELD => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_file_size))?;

                file = Some((data.to_vec(), content_type, file_name));
            }
            FOLDER_FIELD | ALT_TEXT_FIELD => {
                let slot = if field_name == FOLDER_FIELD {
                    &mut folder
                } else {
                    &mut alt_text
                };
                if slot.is_some() {
                    return Err(AppError::InvalidInput(format!(
                        "Field '{}' was sent more than once",
                        field_name
                    )));
                }
                *slot = Some(read_text(field, max_file_size).await?);
            }
            "" => {
                return Err(AppError::InvalidInput(
                    "Multipart field without a name".to_string(),
                ));
            }
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Unknown field '{}'; expected file, folder or altText",
                    other
                )));
            }
        }
    }

    let (data, content_type, file_name) =
        file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    let form = UploadForm {
        data,
        content_type,
        file_name,
        folder: folder.flatten(),
        alt_text: alt_text.flatten(),
    };
    form.validate()?;

    Ok(form)
}
