pub mod health;
pub mod image_upload;
