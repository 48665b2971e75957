//! Vitrine Image Processing Library
//!
//! This crate implements the image ingestion pipeline: the validation gate,
//! SEO filename derivation, the decode/resize/WebP transcode engine and the
//! orchestration that writes the result to storage.

pub mod compression;
pub mod image;
pub mod pipeline;
pub mod slug;
pub mod transcode;
pub mod validator;

// Re-export commonly used types
pub use compression::WebpCompressor;
pub use crate::image::{ImageOrientation, ImageResize};
pub use pipeline::{compose, UploadError, UploadPipeline};
pub use slug::{generate_file_name, sanitize, seo_slug};
pub use transcode::{compression_ratio, EncodeOptions, EncodedAsset, ImageEncoder, ProcessingError};
pub use validator::{UploadValidator, ValidationError, ALLOWED_CONTENT_TYPES};
