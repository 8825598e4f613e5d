//! Path resolution for copy requests.
//!
//! Paths are resolved once, when a copy starts. The paths used for I/O stay
//! relative when no working directory is configured, while progress records
//! always carry absolute forms.

use std::path::{Path, PathBuf};

/// Resolve `path` against an optional working directory.
///
/// With no working directory the path is returned unchanged. Joining an
/// absolute path onto the working directory yields the absolute path.
pub(crate) fn resolve(path: &Path, working_directory: Option<&Path>) -> PathBuf {
    match working_directory {
        Some(base) => base.join(path),
        None => path.to_path_buf(),
    }
}

/// Absolute form of `path`, made against the process current directory.
///
/// Falls back to the path itself if the current directory is unavailable.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Directory that must exist before `destination` can be created.
///
/// Returns `None` for bare file names, whose parent is the current directory.
pub(crate) fn parent_dir(destination: &Path) -> Option<&Path> {
    destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}
