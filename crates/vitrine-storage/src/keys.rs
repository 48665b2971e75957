//! Folder and file name validation shared by storage backends

use crate::traits::{StorageError, StorageResult};

const MAX_FOLDER_LENGTH: usize = 128;

/// Normalize a destination folder.
///
/// Surrounding whitespace and trailing slashes are dropped; everything else is
/// kept verbatim. Rejects values that could resolve outside the public root.
pub fn normalize_folder(folder: &str) -> StorageResult<String> {
    let folder = folder.trim().trim_end_matches('/');

    if folder.is_empty() {
        return Err(StorageError::InvalidFolder("folder is empty".to_string()));
    }

    if folder.len() > MAX_FOLDER_LENGTH {
        return Err(StorageError::InvalidFolder(format!(
            "folder exceeds {} characters",
            MAX_FOLDER_LENGTH
        )));
    }

    if folder.starts_with('/') {
        return Err(StorageError::InvalidFolder(
            "folder must be a relative path".to_string(),
        ));
    }

    if folder.contains('\\') || folder.chars().any(char::is_control) {
        return Err(StorageError::InvalidFolder(
            "folder contains invalid characters".to_string(),
        ));
    }

    if folder
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidFolder(
            "folder contains an empty or relative segment".to_string(),
        ));
    }

    Ok(folder.to_string())
}

/// A file name must be a single path segment
pub fn validate_file_name(file_name: &str) -> StorageResult<()> {
    if file_name.is_empty()
        || file_name.starts_with('.')
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}
