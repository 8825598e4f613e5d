//! Configuration options for copy operations.
//!
//! This module provides [`CopyOptions`] for configuring copy behavior and
//! [`CloneMode`] for controlling the reflink fast path.
//!
//! # Example
//!
//! ```
//! use cpfile::{CloneMode, CopyOptions};
//!
//! let options = CopyOptions::default()
//!     .without_overwrite()
//!     .with_clone_mode(CloneMode::Disabled)
//!     .with_directory_mode(0o755);
//! ```

use crate::progress::{ProgressCallback, ProgressRecord};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Whether to try an OS-level clone (reflink) before copying bytes.
///
/// # Default
///
/// The default is [`CloneMode::Auto`]: the clone is attempted on
/// filesystems that look capable of it and the copy silently falls back to
/// a regular data transfer when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CloneMode {
    /// Try to clone, fall back to copying data on failure.
    #[default]
    Auto,
    /// Clone or fail. The copy errors out when the clone is refused,
    /// including when the destination already exists; it is left as is.
    Force,
    /// Never attempt a clone.
    Disabled,
}

/// Options for a single file copy.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods. The options are only ever borrowed by the
/// copy functions; they are never modified.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `overwrite` | `true` | Replace an existing destination |
/// | `directory_mode` | `0o777` | Mode for created parent directories (umask applies) |
/// | `clone` | `Auto` | Try reflink first |
/// | `working_directory` | `None` | Resolve relative paths against the process cwd |
/// | `on_progress` | `None` | No progress observer |
/// | `preserve_timestamps` | `true` | Copy atime/mtime |
/// | `preserve_permissions` | `true` | Copy mode bits |
/// | `preserve_ownership` | `false` | Copy uid/gid (usually needs privileges) |
/// | `fsync` | `true` | Sync to disk before applying metadata |
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct CopyOptions {
    /// Whether an existing destination may be replaced (default: true)
    ///
    /// When false the destination is opened with exclusive-create semantics
    /// and a pre-existing file yields
    /// [`CopyOutcome::SkippedExists`](crate::CopyOutcome::SkippedExists).
    pub overwrite: bool,

    /// Permission bits for parent directories created on the way
    /// (default: 0o777). Ignored on platforms without POSIX modes.
    pub directory_mode: u32,

    /// Clone (reflink) behaviour
    pub clone: CloneMode,

    /// Base directory for relative source/destination paths
    ///
    /// When `None`, paths are used as given and made absolute against the
    /// process current directory only for progress records.
    pub working_directory: Option<PathBuf>,

    /// Whether to preserve access and modification times (default: true)
    pub preserve_timestamps: bool,

    /// Whether to preserve permission bits (default: true)
    pub preserve_permissions: bool,

    /// Whether to preserve owner and group (default: false)
    ///
    /// Changing ownership normally requires elevated privileges. On
    /// platforms without an owner model this is skipped; elsewhere a
    /// failure fails the copy.
    pub preserve_ownership: bool,

    /// Whether to sync the destination to disk after writing (default: true)
    pub fsync: bool,

    /// Observer invoked synchronously with every progress record
    #[cfg_attr(feature = "serde", serde(skip))]
    pub on_progress: Option<ProgressCallback>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            directory_mode: 0o777,
            clone: CloneMode::Auto,
            working_directory: None,
            preserve_timestamps: true,
            preserve_permissions: true,
            preserve_ownership: false,
            fsync: true,
            on_progress: None,
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("overwrite", &self.overwrite)
            .field("directory_mode", &format_args!("{:#o}", self.directory_mode))
            .field("clone", &self.clone)
            .field("working_directory", &self.working_directory)
            .field("preserve_timestamps", &self.preserve_timestamps)
            .field("preserve_permissions", &self.preserve_permissions)
            .field("preserve_ownership", &self.preserve_ownership)
            .field("fsync", &self.fsync)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "Fn(&ProgressRecord)"))
            .finish()
    }
}

impl CopyOptions {
    /// Keep an existing destination instead of replacing it
    #[must_use]
    pub fn without_overwrite(mut self) -> Self {
        self.overwrite = false;
        self
    }

    /// Set whether an existing destination may be replaced
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the mode used for created parent directories
    #[must_use]
    pub fn with_directory_mode(mut self, mode: u32) -> Self {
        self.directory_mode = mode;
        self
    }

    /// Set the clone behaviour
    #[must_use]
    pub fn with_clone_mode(mut self, clone: CloneMode) -> Self {
        self.clone = clone;
        self
    }

    /// Resolve relative paths against `dir` instead of the process cwd
    #[must_use]
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Register a progress observer
    ///
    /// The callback runs on the copying thread or task, synchronously with
    /// each update. Replaces any previously registered observer.
    #[must_use]
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressRecord) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Disable timestamp preservation
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.preserve_timestamps = false;
        self
    }

    /// Disable permission preservation
    ///
    /// The destination keeps the mode it was created with (umask applied).
    #[must_use]
    pub fn without_permissions(mut self) -> Self {
        self.preserve_permissions = false;
        self
    }

    /// Also copy owner and group from the source
    #[must_use]
    pub fn with_ownership(mut self) -> Self {
        self.preserve_ownership = true;
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Chain `extra` after the registered observer, keeping both.
    pub(crate) fn observe_also(mut self, extra: ProgressCallback) -> Self {
        let combined: ProgressCallback = match self.on_progress.take() {
            Some(first) => Arc::new(move |record: &ProgressRecord| {
                first(record);
                extra(record);
            }),
            None => extra,
        };
        self.on_progress = Some(combined);
        self
    }
}
