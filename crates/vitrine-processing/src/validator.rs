//! Upload validation gate
//!
//! Runs before any decoding. Checks the declared media type against the
//! allow-list first, then the byte length against the configured ceiling.

/// Media types accepted for ingestion
pub const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

const ALLOWED_FORMATS_LABEL: &str = "JPEG, PNG, WebP, GIF";

/// Validation failures surfaced to the uploader
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported file type '{content_type}'. Accepted formats: {allowed}")]
    UnsupportedType {
        content_type: String,
        allowed: &'static str,
    },

    #[error("File size {size} bytes exceeds maximum allowed size of {} MB", .max / (1024 * 1024))]
    TooLarge { size: usize, max: usize },

    #[error("Uploaded file is empty")]
    EmptyFile,
}

/// Pure validator for declared media type and payload size
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate a declared media type and byte length.
    ///
    /// The type check runs first, so an oversized file of an unsupported type
    /// reports `UnsupportedType`.
    pub fn validate(&self, content_type: &str, byte_length: usize) -> Result<(), ValidationError> {
        self.validate_content_type(content_type)?;
        self.validate_file_size(byte_length)
    }

    /// Validate content type against the allow-list.
    ///
    /// Parameters (`; charset=...`) and case are ignored.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_content_type(content_type);

        if !ALLOWED_CONTENT_TYPES.contains(&normalized.as_str()) {
            return Err(ValidationError::UnsupportedType {
                content_type: content_type.to_string(),
                allowed: ALLOWED_FORMATS_LABEL,
            });
        }

        Ok(())
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }
}

/// Lowercase the essence of a media type and drop its parameters
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
