//! Attribute preservation.
//!
//! After the data has been copied the source is stat'ed again, following
//! symlinks, and its metadata is applied to the destination in a fixed
//! order: access/modification times, permission bits, then owner and group.
//! The first failure stops the sequence. Every failure in this phase,
//! including the re-stat, is reported against the destination path.

use super::utils::blocking;
use crate::error::{Attribute, Error, Result};
use crate::options::CopyOptions;
use filetime::FileTime;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Which attributes a copy carries over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttributeSet {
    pub timestamps: bool,
    pub permissions: bool,
    pub ownership: bool,
}

impl AttributeSet {
    pub(crate) fn from_options(options: &CopyOptions) -> Self {
        Self {
            timestamps: options.preserve_timestamps,
            permissions: options.preserve_permissions,
            ownership: options.preserve_ownership,
        }
    }

    fn is_empty(self) -> bool {
        !(self.timestamps || self.permissions || self.ownership)
    }
}

fn attribute_error(destination: &Path, attribute: Attribute) -> impl FnOnce(io::Error) -> Error {
    let path = destination.to_path_buf();
    move |source| Error::Attributes {
        path,
        attribute,
        source,
    }
}

/// Apply the selected attributes of `meta` to `destination`.
fn apply(meta: &Metadata, destination: &Path, set: AttributeSet) -> Result<()> {
    if set.timestamps {
        let atime = FileTime::from_last_access_time(meta);
        let mtime = FileTime::from_last_modification_time(meta);
        filetime::set_file_times(destination, atime, mtime)
            .map_err(attribute_error(destination, Attribute::Timestamps))?;
    }

    if set.permissions {
        fs::set_permissions(destination, meta.permissions())
            .map_err(attribute_error(destination, Attribute::Permissions))?;
    }

    if set.ownership {
        apply_ownership(meta, destination)?;
    }

    Ok(())
}

#[cfg(unix)]
fn apply_ownership(meta: &Metadata, destination: &Path) -> Result<()> {
    use std::os::unix::fs::MetadataExt;

    std::os::unix::fs::chown(destination, Some(meta.uid()), Some(meta.gid()))
        .map_err(attribute_error(destination, Attribute::Ownership))
}

#[cfg(not(unix))]
fn apply_ownership(_meta: &Metadata, _destination: &Path) -> Result<()> {
    // No owner model to carry over
    Ok(())
}

/// Preserve attributes of `source` on `destination` (blocking).
pub(crate) fn preserve(source: &Path, destination: &Path, set: AttributeSet) -> Result<()> {
    if set.is_empty() {
        return Ok(());
    }
    let meta =
        fs::metadata(source).map_err(attribute_error(destination, Attribute::SourceMetadata))?;
    apply(&meta, destination, set)
}

/// Preserve attributes of `source` on `destination` (async).
///
/// The stat is awaited through tokio; setting times and ownership has no
/// async form, so the apply step runs on the blocking pool.
pub(crate) async fn preserve_async(
    source: &Path,
    destination: &Path,
    set: AttributeSet,
) -> Result<()> {
    if set.is_empty() {
        return Ok(());
    }
    let meta = tokio::fs::metadata(source)
        .await
        .map_err(attribute_error(destination, Attribute::SourceMetadata))?;
    let destination: PathBuf = destination.to_path_buf();
    blocking(move || apply(&meta, &destination, set)).await
}
