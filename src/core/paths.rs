//! Path normalization utilities
//!
//! All relative paths in scan results use '/' as separator, so output
//! stays stable across platforms.

use std::path::Path;

/// Normalize a path to use '/' as separator
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the scan root
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Final segment of a path, falling back to the whole path for roots
/// like `/` that have no file name
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| normalize_path(path))
}

/// Lowercased extension, if any
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
