//! Builder API for ergonomic copying operations.
//!
//! The builder pattern provides a fluent interface for configuring and executing
//! a copy. This is often more convenient than manually constructing
//! [`CopyOptions`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use cpfile::CopyBuilder;
//!
//! // Blocking copy with defaults
//! let outcome = CopyBuilder::new("input.bin", "output.bin").run_sync()?;
//! println!("Copied {} bytes", outcome.bytes());
//! # Ok::<(), cpfile::Error>(())
//! ```
//!
//! ## With Options
//!
//! ```no_run
//! use cpfile::CopyBuilder;
//!
//! # async fn run() -> cpfile::Result<()> {
//! let outcome = CopyBuilder::new("input.bin", "archive/input.bin")
//!     .no_overwrite()        // Leave an existing destination alone
//!     .no_clone()            // Always copy the bytes
//!     .directory_mode(0o755) // Mode for created parents
//!     .on_progress(|p| println!("{}/{}", p.written_bytes, p.size))
//!     .run()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::copy::{CopyHandle, CopyOutcome, copy_file, copy_file_sync, spawn_copy};
use crate::error::Result;
use crate::options::{CloneMode, CopyOptions};
use crate::progress::ProgressRecord;
use std::path::{Path, PathBuf};

/// A builder for configuring and executing a single file copy.
///
/// # Example
///
/// ```no_run
/// use cpfile::CopyBuilder;
///
/// let outcome = CopyBuilder::new("/data/disk.img", "/backup/disk.img")
///     .force_clone()
///     .run_sync()?;
/// # Ok::<(), cpfile::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with the given source and destination paths.
    ///
    /// Uses default options (overwrite, auto clone, preserve timestamps and
    /// permissions, fsync).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Leave an existing destination untouched.
    ///
    /// The copy then reports [`CopyOutcome::SkippedExists`].
    #[must_use]
    pub fn no_overwrite(mut self) -> Self {
        self.options = self.options.without_overwrite();
        self
    }

    /// Replace an existing destination (default behavior).
    #[must_use]
    pub fn overwrite(mut self) -> Self {
        self.options = self.options.with_overwrite(true);
        self
    }

    /// Set the clone behaviour.
    #[must_use]
    pub fn clone_mode(mut self, mode: CloneMode) -> Self {
        self.options = self.options.with_clone_mode(mode);
        self
    }

    /// Require a filesystem clone; fail instead of copying bytes.
    #[must_use]
    pub fn force_clone(self) -> Self {
        self.clone_mode(CloneMode::Force)
    }

    /// Never attempt a filesystem clone.
    #[must_use]
    pub fn no_clone(self) -> Self {
        self.clone_mode(CloneMode::Disabled)
    }

    /// Set the mode used for created parent directories (default: 0o777).
    #[must_use]
    pub fn directory_mode(mut self, mode: u32) -> Self {
        self.options = self.options.with_directory_mode(mode);
        self
    }

    /// Resolve relative paths against `dir`.
    #[must_use]
    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_working_directory(dir);
        self
    }

    /// Register a progress observer.
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressRecord) + Send + Sync + 'static,
    {
        self.options = self.options.with_progress(callback);
        self
    }

    /// Don't preserve access and modification times.
    #[must_use]
    pub fn no_timestamps(mut self) -> Self {
        self.options = self.options.without_timestamps();
        self
    }

    /// Don't preserve permission bits.
    #[must_use]
    pub fn no_permissions(mut self) -> Self {
        self.options = self.options.without_permissions();
        self
    }

    /// Copy owner and group as well (usually needs privileges).
    #[must_use]
    pub fn preserve_ownership(mut self) -> Self {
        self.options = self.options.with_ownership();
        self
    }

    /// Skip fsync for faster but less durable copies.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the copy on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// See [`copy_file`](crate::copy_file).
    pub async fn run(self) -> Result<CopyOutcome> {
        copy_file(&self.src, &self.dst, &self.options).await
    }

    /// Execute the copy, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// See [`copy_file_sync`](crate::copy_file_sync).
    pub fn run_sync(self) -> Result<CopyOutcome> {
        copy_file_sync(&self.src, &self.dst, &self.options)
    }

    /// Start the copy as a tokio task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(self) -> CopyHandle {
        spawn_copy(self.src, self.dst, self.options)
    }
}
