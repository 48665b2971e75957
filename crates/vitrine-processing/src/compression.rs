use crate::transcode::ProcessingError;
use image::{DynamicImage, GenericImageView};

/// Encoder method (0 = fastest, 6 = slowest/smallest)
const WEBP_METHOD: i32 = 4;

/// Lossy WebP compressor
pub struct WebpCompressor;

impl WebpCompressor {
    /// Encode an image as lossy WebP.
    ///
    /// Sharp RGB to YUV conversion is enabled to keep edges and text crisp.
    /// The alpha channel is kept only when the source has one.
    pub fn compress(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
        let (width, height) = img.dimensions();

        let mut config = webp::WebPConfig::new().map_err(|_| {
            ProcessingError::Encode("failed to initialize WebP encoder config".to_string())
        })?;
        config.lossless = 0;
        config.quality = f32::from(quality.min(100));
        config.method = WEBP_METHOD;
        config.use_sharp_yuv = 1;

        let encoded = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            webp::Encoder::from_rgba(&rgba, width, height).encode_advanced(&config)
        } else {
            let rgb = img.to_rgb8();
            webp::Encoder::from_rgb(&rgb, width, height).encode_advanced(&config)
        }
        .map_err(|e| ProcessingError::Encode(format!("WebP encoding failed: {:?}", e)))?;

        Ok(encoded.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn test_compress_produces_webp() {
        let data = WebpCompressor::compress(&gradient(64, 48), 85).unwrap();

        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::WebP);

        let decoded = image::load_from_memory_with_format(&data, ImageFormat::WebP).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn test_compress_keeps_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 0])));
        let data = WebpCompressor::compress(&img, 85).unwrap();

        let decoded = image::load_from_memory_with_format(&data, ImageFormat::WebP).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = gradient(256, 256);
        let high = WebpCompressor::compress(&img, 95).unwrap();
        let low = WebpCompressor::compress(&img, 20).unwrap();
        assert!(low.len() < high.len());
    }
}
