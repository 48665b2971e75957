//! Decode, orient, downscale and re-encode uploads as WebP
//!
//! Everything here is CPU-bound and synchronous. Callers on an async runtime
//! should run [`ImageEncoder::encode`] on a blocking thread.

use crate::compression::WebpCompressor;
use crate::image::{ImageOrientation, ImageResize};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Limits};
use std::io::Cursor;
use std::time::Instant;
use vitrine_core::UploadSettings;

/// Largest accepted source edge, guards against decompression bombs
pub const MAX_SOURCE_DIMENSION: u32 = 16_384;

/// Ceiling on decoder allocations
const MAX_DECODE_ALLOC_BYTES: u64 = 512 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::from(&UploadSettings::default())
    }
}

impl From<&UploadSettings> for EncodeOptions {
    fn from(settings: &UploadSettings) -> Self {
        Self {
            max_width: settings.max_width,
            max_height: settings.max_height,
            quality: settings.quality,
        }
    }
}

/// Transcoded image ready to be stored
#[derive(Debug, Clone)]
pub struct EncodedAsset {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Byte length of the uploaded source
    pub original_size: u64,
}

impl EncodedAsset {
    pub fn optimized_size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn compression_ratio(&self) -> i64 {
        compression_ratio(self.original_size, self.optimized_size())
    }
}

/// Percentage saved: `round((1 - optimized / original) * 100)`.
///
/// Negative when the output is larger than the input. Zero for an empty input.
pub fn compression_ratio(original_size: u64, optimized_size: u64) -> i64 {
    if original_size == 0 {
        return 0;
    }
    ((1.0 - optimized_size as f64 / original_size as f64) * 100.0).round() as i64
}

/// WebP transcoder
#[derive(Debug, Clone, Default)]
pub struct ImageEncoder {
    options: EncodeOptions,
}

impl ImageEncoder {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Transcode raw upload bytes.
    ///
    /// The format is sniffed from the bytes, never taken from the declared
    /// media type. Animated GIFs are reduced to their first frame.
    pub fn encode(&self, data: &[u8]) -> Result<EncodedAsset, ProcessingError> {
        let start = Instant::now();

        let img = Self::decode(data)?;
        let img = ImageOrientation::apply_exif_orientation(img, data);
        let img = ImageResize::fit_image(img, self.options.max_width, self.options.max_height);
        let (width, height) = img.dimensions();

        let encoded = WebpCompressor::compress(&img, self.options.quality)?;
        let asset = EncodedAsset {
            data: encoded,
            width,
            height,
            original_size: data.len() as u64,
        };

        tracing::debug!(
            width = width,
            height = height,
            original_size = asset.original_size,
            optimized_size = asset.optimized_size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transcoded to WebP"
        );

        Ok(asset)
    }

    fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;

        match reader.format() {
            Some(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP | ImageFormat::Gif) => {}
            Some(other) => {
                return Err(ProcessingError::UnsupportedFormat(format!("{:?}", other)));
            }
            None => {
                return Err(ProcessingError::Decode(
                    "unrecognized image signature".to_string(),
                ));
            }
        }

        let mut limits = Limits::default();
        limits.max_image_width = Some(MAX_SOURCE_DIMENSION);
        limits.max_image_height = Some(MAX_SOURCE_DIMENSION);
        limits.max_alloc = Some(MAX_DECODE_ALLOC_BYTES);
        reader.limits(limits);

        reader
            .decode()
            .map_err(|e| ProcessingError::Decode(e.to_string()))
    }
}
