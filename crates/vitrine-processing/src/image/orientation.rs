use image::DynamicImage;
use std::io::Cursor;

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Read the EXIF orientation tag (1-8) from raw image bytes.
    ///
    /// Returns 1 (upright) when the container carries no EXIF block, the tag
    /// is missing or its value is out of range.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let mut cursor = Cursor::new(data);
        let exif = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(_) => return 1,
        };

        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .and_then(|value| u8::try_from(value).ok())
            .filter(|value| (1..=8).contains(value))
            .unwrap_or(1)
    }

    /// Transforms for an EXIF orientation: (clockwise rotation, flip horizontal, flip vertical).
    ///
    /// Rotation is applied before the flip.
    pub fn get_orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
        match orientation {
            2 => (None, true, false),
            3 => (Some(180), false, false),
            4 => (None, false, true),
            // transpose
            5 => (Some(90), true, false),
            6 => (Some(90), false, false),
            // transverse
            7 => (Some(270), true, false),
            8 => (Some(270), false, false),
            _ => (None, false, false),
        }
    }

    /// Apply EXIF orientation correction so the pixels are stored upright
    pub fn apply_exif_orientation(img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        if orientation == 1 {
            return img;
        }
        Self::apply_orientation(img, orientation)
    }

    pub fn apply_orientation(mut img: DynamicImage, orientation: u8) -> DynamicImage {
        let (rotate, flip_h, flip_v) = Self::get_orientation_transforms(orientation);

        tracing::debug!(
            orientation = orientation,
            rotate = ?rotate,
            flip_horizontal = flip_h,
            flip_vertical = flip_v,
            "Applying EXIF orientation"
        );

        if let Some(angle) = rotate {
            img = Self::rotate_by_angle(img, angle);
        }
        if flip_h {
            img = img.fliph();
        }
        if flip_v {
            img = img.flipv();
        }

        img
    }

    /// Rotate image by 90, 180 or 270 degrees clockwise
    pub fn rotate_by_angle(img: DynamicImage, angle: u16) -> DynamicImage {
        match angle {
            90 => img.rotate90(),
            180 => img.rotate180(),
            270 => img.rotate270(),
            _ => img,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    /// 2x1 image: red on the left, blue on the right
    fn two_pixel_image() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_no_exif_defaults_to_upright() {
        assert_eq!(ImageOrientation::read_exif_orientation(b"not an image"), 1);
        assert_eq!(ImageOrientation::read_exif_orientation(&[]), 1);
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 2));

        for orientation in [5u8, 6, 7, 8] {
            let corrected = ImageOrientation::apply_orientation(img.clone(), orientation);
            assert_eq!(corrected.dimensions(), (2, 4), "orientation {}", orientation);
        }
        for orientation in [1u8, 2, 3, 4] {
            let corrected = ImageOrientation::apply_orientation(img.clone(), orientation);
            assert_eq!(corrected.dimensions(), (4, 2), "orientation {}", orientation);
        }
    }

    #[test]
    fn test_orientation_pixel_placement() {
        let red = image::Rgba([255, 0, 0, 255]);

        // Mirror: red moves to the right
        let mirrored = ImageOrientation::apply_orientation(two_pixel_image(), 2);
        assert_eq!(mirrored.get_pixel(1, 0), red);

        // 90 degrees clockwise: left column becomes the top row
        let rotated = ImageOrientation::apply_orientation(two_pixel_image(), 6);
        assert_eq!(rotated.get_pixel(0, 0), red);

        // 270 degrees clockwise: left column becomes the bottom row
        let rotated = ImageOrientation::apply_orientation(two_pixel_image(), 8);
        assert_eq!(rotated.get_pixel(0, 1), red);

        // Transpose keeps (0, 0) in place
        let transposed = ImageOrientation::apply_orientation(two_pixel_image(), 5);
        assert_eq!(transposed.get_pixel(0, 0), red);

        // Transverse sends (0, 0) to the opposite corner
        let transversed = ImageOrientation::apply_orientation(two_pixel_image(), 7);
        assert_eq!(transversed.get_pixel(0, 1), red);
    }

    #[test]
    fn test_invalid_angle_is_noop() {
        let img = two_pixel_image();
        let rotated = ImageOrientation::rotate_by_angle(img.clone(), 45);
        assert_eq!(rotated.dimensions(), img.dimensions());
    }
}
