//! Reflink/Copy-on-Write clone strategy.
//!
//! A clone duplicates a file by sharing its extents, so it completes in
//! constant time on filesystems that support it (Btrfs, XFS with reflink,
//! APFS). Support needs the `reflink` feature; without it every clone
//! request reports [`io::ErrorKind::Unsupported`].

use crate::options::CloneMode;
use std::io;
use std::path::Path;

/// Whether this build can issue clone requests at all.
const CLONE_AVAILABLE: bool = cfg!(all(
    feature = "reflink",
    any(target_os = "linux", target_os = "macos")
));

/// Result of a single clone request.
#[derive(Debug)]
pub(crate) enum CloneAttempt {
    /// The destination now shares the source's data
    Cloned,
    /// Overwrite is disabled and the destination already exists
    Exists,
    /// The filesystem refused; the destination was not created
    Failed(io::Error),
}

#[cfg(all(feature = "reflink", target_os = "linux"))]
mod platform {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    // CoW filesystem magic numbers (from /usr/include/linux/magic.h)
    const BTRFS_SUPER_MAGIC: u32 = 0x9123_683E;
    // Note: XFS requires reflink to be enabled at mkfs time
    const XFS_SUPER_MAGIC: u32 = 0x5846_5342;

    /// Check the filesystem type of `dir` with statfs.
    pub fn supports_reflink(dir: &Path) -> bool {
        let Ok(path_cstr) = CString::new(dir.as_os_str().as_bytes()) else {
            return false;
        };

        let mut statfs_buf: libc::statfs = unsafe { std::mem::zeroed() };
        let result = unsafe { libc::statfs(path_cstr.as_ptr(), &mut statfs_buf) };
        if result != 0 {
            return false;
        }

        // f_type is a signed word on some targets; the magic fits in 32 bits
        #[allow(clippy::unnecessary_cast)]
        let fs_type = statfs_buf.f_type as u32;
        fs_type == BTRFS_SUPER_MAGIC || fs_type == XFS_SUPER_MAGIC
    }
}

#[cfg(all(feature = "reflink", target_os = "macos"))]
mod platform {
    use std::path::Path;

    /// APFS is the default on modern macOS, so we optimistically try reflink
    pub fn supports_reflink(_dir: &Path) -> bool {
        true
    }
}

#[cfg(not(all(feature = "reflink", any(target_os = "linux", target_os = "macos"))))]
mod platform {
    use std::path::Path;

    pub fn supports_reflink(_dir: &Path) -> bool {
        false
    }
}

/// Check if the filesystem that will hold `destination` looks able to clone.
///
/// # Platform Support
///
/// | Platform | Detection Method |
/// |----------|-----------------|
/// | Linux | Checks for Btrfs or XFS via `statfs` on the parent directory |
/// | macOS | Assumes APFS (optimistic) |
/// | Other | Returns `false` |
pub(crate) fn supports_reflink(destination: &Path) -> bool {
    let dir = crate::utils::path::parent_dir(destination).unwrap_or(Path::new("."));
    platform::supports_reflink(dir)
}

#[cfg(all(feature = "reflink", any(target_os = "linux", target_os = "macos")))]
fn reflink(source: &Path, destination: &Path) -> io::Result<()> {
    reflink_copy::reflink(source, destination)
}

#[cfg(not(all(feature = "reflink", any(target_os = "linux", target_os = "macos"))))]
fn reflink(_source: &Path, _destination: &Path) -> io::Result<()> {
    Err(unsupported())
}

fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "filesystem clones are not available in this build",
    )
}

/// Issue one clone request from `source` to `destination`.
///
/// The clone target is created exclusively, so an existing destination is
/// never unlinked here. Without `overwrite` that conflict means the copy is
/// skipped; with it the request counts as refused and the caller either
/// fails (`Force`) or truncates the file in place (`Auto`).
pub(crate) fn clone_file(source: &Path, destination: &Path, overwrite: bool) -> CloneAttempt {
    if !CLONE_AVAILABLE {
        return CloneAttempt::Failed(unsupported());
    }

    match reflink(source, destination) {
        Ok(()) => CloneAttempt::Cloned,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && !overwrite => CloneAttempt::Exists,
        Err(e) => CloneAttempt::Failed(e),
    }
}

/// Decide whether to clone and, if so, make the request.
///
/// Returns `None` when cloning is disabled, or in `Auto` mode when the
/// destination filesystem does not look capable of it.
pub(crate) fn attempt_clone(
    source: &Path,
    destination: &Path,
    mode: CloneMode,
    overwrite: bool,
) -> Option<CloneAttempt> {
    let wanted = match mode {
        CloneMode::Disabled => false,
        CloneMode::Force => true,
        CloneMode::Auto => supports_reflink(destination),
    };
    wanted.then(|| clone_file(source, destination, overwrite))
}
