//! Error types for cpfile.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during a copy, the coarse [`ErrorKind`] classification,
//! and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Validation | [`Error::InvalidArgument`], [`Error::IsADirectory`], [`Error::NotAFile`] |
//! | Source side | [`Error::Stat`], [`Error::Read`] |
//! | Destination side | [`Error::CreateDir`], [`Error::Write`], [`Error::Clone`], [`Error::Attributes`] |
//! | Runtime | [`Error::Io`] |
//!
//! Every error that comes from the operating system keeps the original
//! [`io::Error`] as its [`source`](std::error::Error::source), and exposes
//! the OS code through [`Error::code`] and [`Error::errno`] so callers can
//! branch on `ENOENT`, `ENOSPC` and friends without string matching.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for cpfile operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// This helper function detects storage-full conditions across platforms.
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use cpfile::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            return raw_error == libc::ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Coarse classification of an [`Error`].
///
/// Use [`Error::kind`] to obtain it. `AlreadyExists` is only ever produced
/// by the lower layers; the copy functions turn an exclusive-create
/// conflict into [`CopyOutcome::SkippedExists`](crate::CopyOutcome::SkippedExists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Source or destination argument was empty
    InvalidArgument,
    /// A path did not exist
    NotFound,
    /// Destination exists and overwriting was disabled
    AlreadyExists,
    /// The OS refused access (`EACCES`/`EPERM`)
    PermissionDenied,
    /// A directory was found where a file was expected
    IsADirectory,
    /// The source is a FIFO, socket or device rather than a regular file
    NotAFile,
    /// The destination device is full
    NoSpace,
    /// Generic I/O failure with no more specific classification
    Io,
    /// Any other OS error, carrying its raw errno
    Other(i32),
}

impl ErrorKind {
    fn of(error: &io::Error) -> Self {
        if is_no_space_error(error) {
            return Self::NoSpace;
        }
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::IsADirectory => Self::IsADirectory,
            _ => match error.raw_os_error() {
                #[cfg(unix)]
                Some(libc::EIO) => Self::Io,
                Some(errno) => Self::Other(errno),
                None => Self::Io,
            },
        }
    }
}

/// Which piece of metadata the attribute preserver was applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Access and modification times
    Timestamps,
    /// Permission bits
    Permissions,
    /// Owner and group
    Ownership,
    /// Re-reading the source's metadata before applying it
    SourceMetadata,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timestamps => "timestamps",
            Self::Permissions => "permissions",
            Self::Ownership => "ownership",
            Self::SourceMetadata => "source metadata",
        })
    }
}

/// Errors that can occur during copy operations.
///
/// All errors include the path they pertain to (source or destination),
/// so read-side failures can be told apart from write-side failures.
/// The underlying OS error stays reachable through
/// [`std::error::Error::source`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required path argument was empty
    #[error("`source` and `destination` required: `{0}` is empty")]
    InvalidArgument(&'static str),

    /// Source is a directory; only regular files can be copied
    #[error("cannot copy `{0}`: source is a directory")]
    IsADirectory(PathBuf),

    /// Source is not a regular file (FIFO, socket, device)
    #[error("cannot copy `{0}`: source is not a regular file")]
    NotAFile(PathBuf),

    /// Failed to stat the source
    #[error("cannot stat path `{path}`: {source}")]
    Stat {
        /// Source path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create the destination's parent directory
    #[error("cannot create directory `{path}`: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to open or read the source
    #[error("cannot read from `{path}`: {source}")]
    Read {
        /// Source path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to open, write or flush the destination
    #[error("cannot write to `{path}`: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A forced clone (reflink) request failed
    #[error("cannot clone to `{path}`: {source}")]
    Clone {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Data was copied but metadata could not be applied
    #[error("cannot preserve {attribute} of `{path}`: {source}")]
    Attributes {
        /// Destination path
        path: PathBuf,
        /// Which attribute failed
        attribute: Attribute,
        /// Underlying error
        source: io::Error,
    },

    /// IO error not tied to a path (e.g. a blocking task that died)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// The underlying OS error, if this error wraps one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::InvalidArgument(_) | Self::IsADirectory(_) | Self::NotAFile(_) => None,
            Self::Stat { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Clone { source, .. }
            | Self::Attributes { source, .. } => Some(source),
            Self::Io(source) => Some(source),
        }
    }

    /// The path this error pertains to.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidArgument(_) | Self::Io(_) => None,
            Self::IsADirectory(path)
            | Self::NotAFile(path)
            | Self::Stat { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Clone { path, .. }
            | Self::Attributes { path, .. } => Some(path),
        }
    }

    /// Coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::IsADirectory(_) => ErrorKind::IsADirectory,
            Self::NotAFile(_) => ErrorKind::NotAFile,
            other => other.io_error().map_or(ErrorKind::Io, ErrorKind::of),
        }
    }

    /// OS-style error code such as `"ENOENT"`, `"EEXIST"` or `"ENOSPC"`.
    ///
    /// The raw errno is translated when present; otherwise the code is
    /// derived from the [`ErrorKind`]. Argument errors have no code.
    pub fn code(&self) -> Option<&'static str> {
        if let Some(name) = self.errno().and_then(errno_name) {
            return Some(name);
        }
        match self.kind() {
            ErrorKind::InvalidArgument | ErrorKind::Other(_) => None,
            ErrorKind::NotFound => Some("ENOENT"),
            ErrorKind::AlreadyExists => Some("EEXIST"),
            ErrorKind::PermissionDenied => Some("EACCES"),
            ErrorKind::IsADirectory => Some("EISDIR"),
            ErrorKind::NotAFile => Some("EINVAL"),
            ErrorKind::NoSpace => Some("ENOSPC"),
            ErrorKind::Io => Some("EIO"),
        }
    }

    /// Platform errno, when available.
    pub fn errno(&self) -> Option<i32> {
        match self {
            #[cfg(unix)]
            Self::IsADirectory(_) => Some(libc::EISDIR),
            #[cfg(unix)]
            Self::NotAFile(_) => Some(libc::EINVAL),
            other => other.io_error().and_then(io::Error::raw_os_error),
        }
    }
}

#[cfg(unix)]
fn errno_name(errno: i32) -> Option<&'static str> {
    let name = match errno {
        libc::EPERM => "EPERM",
        libc::ENOENT => "ENOENT",
        libc::EINTR => "EINTR",
        libc::EIO => "EIO",
        libc::EBADF => "EBADF",
        libc::EAGAIN => "EAGAIN",
        libc::EACCES => "EACCES",
        libc::EBUSY => "EBUSY",
        libc::EEXIST => "EEXIST",
        libc::EXDEV => "EXDEV",
        libc::ENOTDIR => "ENOTDIR",
        libc::EISDIR => "EISDIR",
        libc::EINVAL => "EINVAL",
        libc::ENFILE => "ENFILE",
        libc::EMFILE => "EMFILE",
        libc::ETXTBSY => "ETXTBSY",
        libc::EFBIG => "EFBIG",
        libc::ENOSPC => "ENOSPC",
        libc::EROFS => "EROFS",
        libc::ENAMETOOLONG => "ENAMETOOLONG",
        libc::ENOSYS => "ENOSYS",
        libc::ELOOP => "ELOOP",
        libc::EOPNOTSUPP => "EOPNOTSUPP",
        libc::EDQUOT => "EDQUOT",
        _ => return None,
    };
    Some(name)
}

#[cfg(not(unix))]
fn errno_name(_errno: i32) -> Option<&'static str> {
    None
}
