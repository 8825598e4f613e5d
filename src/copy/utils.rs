//! Utility functions for file copy operations.
//!
//! This module contains helpers used by both the blocking and the async
//! pipeline: destination open flags, parent directory creation, and a
//! bridge for running blocking primitives from async code.

use crate::error::{Error, Result};
use crate::utils::path::parent_dir;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

// =============================================================================
// Destination handling
// =============================================================================

/// Open flags for the destination file.
///
/// Exclusivity is requested at open time (`O_EXCL`) rather than by checking
/// for the file first, so a concurrent creator cannot slip in between.
pub(crate) fn destination_options(overwrite: bool) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options
}

/// Whether an open failure means "destination exists, leave it alone".
#[inline]
pub(crate) fn is_skip(error: &io::Error, overwrite: bool) -> bool {
    !overwrite && error.kind() == io::ErrorKind::AlreadyExists
}

// =============================================================================
// Directory utilities
// =============================================================================

fn dir_error(parent: &Path, source: io::Error) -> Result<()> {
    if source.kind() == io::ErrorKind::AlreadyExists {
        return Ok(());
    }
    Err(Error::CreateDir {
        path: parent.to_path_buf(),
        source,
    })
}

/// Create the destination's parent directories with `mode`.
pub(crate) fn create_parent(destination: &Path, mode: u32) -> Result<()> {
    let Some(parent) = parent_dir(destination) else {
        return Ok(());
    };

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(parent).or_else(|e| dir_error(parent, e))
}

/// Async form of [`create_parent`].
pub(crate) async fn create_parent_async(destination: &Path, mode: u32) -> Result<()> {
    let Some(parent) = parent_dir(destination) else {
        return Ok(());
    };

    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;

    match builder.create(parent).await {
        Ok(()) => Ok(()),
        Err(e) => dir_error(parent, e),
    }
}

// =============================================================================
// Async bridge
// =============================================================================

/// Run a blocking filesystem primitive on tokio's blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Io(io::Error::other(e)))?
}

// =============================================================================
// Tests
// =============================================================================
