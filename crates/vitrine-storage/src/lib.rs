//! Vitrine Storage Library
//!
//! Persists optimized assets under the public static-serving root.
//!
//! # Layout
//!
//! A file written to folder `blog` with name `photo-1700000000000.webp` lands at
//! `<public-root>/blog/photo-1700000000000.webp` and is served at
//! `/blog/photo-1700000000000.webp`. Folders are relative subpaths; they must not
//! be absolute or contain `..` segments. Validation lives in the `keys` module.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::{normalize_folder, validate_file_name};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredFile};
