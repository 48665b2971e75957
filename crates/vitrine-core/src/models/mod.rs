pub mod upload;

pub use upload::{UploadRequest, UploadResult};
