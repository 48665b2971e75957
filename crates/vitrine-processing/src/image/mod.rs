//! Image geometry module
//!
//! - EXIF orientation correction (orientation)
//! - Bounding-box downscaling (resize)

pub mod orientation;
pub mod resize;

pub use orientation::ImageOrientation;
pub use resize::ImageResize;
