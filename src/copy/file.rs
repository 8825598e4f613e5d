//! Single file copy operations.
//!
//! This module provides the orchestrator shared by the blocking
//! [`copy_file_sync`] and the async [`copy_file`], plus [`spawn_copy`] for a
//! detached copy whose progress can be watched.
//!
//! Each call runs the same steps, each a precondition for the next:
//!
//! 1. Reject empty paths before touching the filesystem
//! 2. Resolve paths against the configured working directory
//! 3. Stat the source (following symlinks) and refuse anything but a regular file
//! 4. Create the destination's parent directories
//! 5. Transfer the data (clone, streamed or buffered)
//! 6. Preserve attributes
//!
//! A failure after writing has started leaves the partially written
//! destination in place.

use super::attrs::{AttributeSet, preserve, preserve_async};
use super::strategy::{Strategy, Transfer, transfer_async, transfer_blocking};
use super::utils::{create_parent, create_parent_async};
use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::progress::{ProgressRecord, ProgressTracker};
use crate::utils::path::{absolute, resolve};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Result of a file copy that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "camelCase"))]
pub enum CopyOutcome {
    /// The data was copied and the selected attributes applied
    Copied {
        /// Bytes now in the destination
        bytes: u64,
        /// How the bytes got there
        strategy: Strategy,
    },
    /// Overwrite was disabled and the destination already existed; it was
    /// left untouched
    SkippedExists,
}

impl CopyOutcome {
    /// Whether the destination was written.
    pub fn is_copied(&self) -> bool {
        matches!(self, Self::Copied { .. })
    }

    /// Bytes copied (0 if skipped).
    pub fn bytes(&self) -> u64 {
        match self {
            Self::Copied { bytes, .. } => *bytes,
            Self::SkippedExists => 0,
        }
    }
}

/// Paths of one copy, resolved once.
struct CopyJob {
    source: PathBuf,
    destination: PathBuf,
    source_absolute: PathBuf,
    destination_absolute: PathBuf,
}

impl CopyJob {
    fn prepare(source: &Path, destination: &Path, options: &CopyOptions) -> Result<Self> {
        if source.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("source"));
        }
        if destination.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("destination"));
        }

        let base = options.working_directory.as_deref();
        let source = resolve(source, base);
        let destination = resolve(destination, base);
        Ok(Self {
            source_absolute: absolute(&source),
            destination_absolute: absolute(&destination),
            source,
            destination,
        })
    }

    fn tracker(&self, options: &CopyOptions) -> ProgressTracker {
        ProgressTracker::new(
            &self.source_absolute,
            &self.destination_absolute,
            options.on_progress.clone(),
        )
    }

    fn check_source(&self, meta: &Metadata) -> Result<()> {
        if meta.is_dir() {
            return Err(Error::IsADirectory(self.source.clone()));
        }
        // FIFOs and devices report no size and may never reach end of file
        if !meta.is_file() {
            return Err(Error::NotAFile(self.source.clone()));
        }
        Ok(())
    }

    fn stat_error(&self) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::Stat {
            path: self.source.clone(),
            source,
        }
    }
}

fn outcome(transfer: Transfer) -> CopyOutcome {
    match transfer {
        Transfer::Copied { bytes, strategy } => CopyOutcome::Copied { bytes, strategy },
        Transfer::Skipped => CopyOutcome::SkippedExists,
    }
}

/// Copy a single file, blocking the calling thread.
///
/// Data moves through one [`BUFFER_SIZE`](crate::BUFFER_SIZE) buffer unless
/// a clone succeeds first.
///
/// # Arguments
///
/// * `source` - File to copy; symlinks are followed
/// * `destination` - Target path; missing parent directories are created
/// * `options` - Copy options (borrowed, never modified)
///
/// # Returns
///
/// [`CopyOutcome::Copied`] on success, or [`CopyOutcome::SkippedExists`]
/// when overwriting is disabled and the destination already exists.
///
/// # Errors
///
/// Returns an error if:
/// - A path is empty ([`Error::InvalidArgument`])
/// - The source cannot be stat'ed ([`Error::Stat`]) or is a directory ([`Error::IsADirectory`])
/// - The source is a FIFO, socket or device ([`Error::NotAFile`])
/// - The parent directory cannot be created ([`Error::CreateDir`])
/// - Reading or writing fails ([`Error::Read`], [`Error::Write`])
/// - A forced clone is refused ([`Error::Clone`])
/// - Metadata cannot be applied ([`Error::Attributes`])
///
/// # Example
///
/// ```no_run
/// use cpfile::{CopyOptions, copy_file_sync};
///
/// let outcome = copy_file_sync("input.bin", "backup/input.bin", &CopyOptions::default())?;
/// println!("copied {} bytes", outcome.bytes());
/// # Ok::<(), cpfile::Error>(())
/// ```
pub fn copy_file_sync(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &CopyOptions,
) -> Result<CopyOutcome> {
    let job = CopyJob::prepare(source.as_ref(), destination.as_ref(), options)?;
    let mut tracker = job.tracker(options);

    let meta = fs::metadata(&job.source).map_err(job.stat_error())?;
    job.check_source(&meta)?;
    tracker.set_size(meta.len());

    create_parent(&job.destination, options.directory_mode)?;

    let transfer = transfer_blocking(&job.source, &job.destination, options, &mut tracker)?;
    if let Transfer::Copied { .. } = transfer {
        preserve(
            &job.source,
            &job.destination,
            AttributeSet::from_options(options),
        )?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "copy {} -> {}: {:?}",
        job.source.display(),
        job.destination.display(),
        transfer
    );

    Ok(outcome(transfer))
}

/// Copy a single file on the tokio runtime.
///
/// Every filesystem call is awaited. Calls without an async form (clone,
/// setting times, chown) run on the blocking pool. Dropping the future
/// stops the copy between steps but may leave a partial destination.
///
/// Arguments, outcome and errors are the same as for [`copy_file_sync`];
/// equivalent failures carry the same [`Error::code`] and [`Error::path`].
///
/// # Example
///
/// ```no_run
/// use cpfile::{CopyOptions, copy_file};
///
/// # async fn run() -> cpfile::Result<()> {
/// let options = CopyOptions::default().with_progress(|p| {
///     println!("{:.0}%", p.percent * 100.0);
/// });
/// copy_file("input.bin", "output.bin", &options).await?;
/// # Ok(())
/// # }
/// ```
pub async fn copy_file(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &CopyOptions,
) -> Result<CopyOutcome> {
    let job = CopyJob::prepare(source.as_ref(), destination.as_ref(), options)?;
    let mut tracker = job.tracker(options);

    let meta = tokio::fs::metadata(&job.source)
        .await
        .map_err(job.stat_error())?;
    job.check_source(&meta)?;
    tracker.set_size(meta.len());

    create_parent_async(&job.destination, options.directory_mode).await?;

    let transfer = transfer_async(&job.source, &job.destination, options, &mut tracker).await?;
    if let Transfer::Copied { .. } = transfer {
        preserve_async(
            &job.source,
            &job.destination,
            AttributeSet::from_options(options),
        )
        .await?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "copy {} -> {}: {:?}",
        job.source.display(),
        job.destination.display(),
        transfer
    );

    Ok(outcome(transfer))
}

/// A copy running as its own tokio task.
///
/// Created by [`spawn_copy`]. The latest progress record is kept in a watch
/// channel, so a subscriber that attaches late still sees the final 100%
/// record once the copy has finished.
#[derive(Debug)]
pub struct CopyHandle {
    task: JoinHandle<Result<CopyOutcome>>,
    progress: watch::Receiver<Option<ProgressRecord>>,
}

impl CopyHandle {
    /// Subscribe to progress. Holds `None` until the first record.
    pub fn progress(&self) -> watch::Receiver<Option<ProgressRecord>> {
        self.progress.clone()
    }

    /// Whether the copy task has completed.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the copy to finish.
    ///
    /// # Errors
    ///
    /// Returns the copy's error, or [`Error::Io`] if the task panicked or
    /// was aborted.
    pub async fn wait(self) -> Result<CopyOutcome> {
        self.task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

/// Start a copy as a tokio task and return a handle to it.
///
/// Any observer already registered in `options` keeps receiving records;
/// the handle's channel receives them as well.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use cpfile::{CopyOptions, spawn_copy};
///
/// # async fn run() -> cpfile::Result<()> {
/// let handle = spawn_copy("big.iso", "copy.iso", CopyOptions::default());
/// let mut progress = handle.progress();
/// tokio::spawn(async move {
///     while progress.changed().await.is_ok() {
///         if let Some(record) = progress.borrow().as_ref() {
///             println!("{}/{}", record.written_bytes, record.size);
///         }
///     }
/// });
/// handle.wait().await?;
/// # Ok(())
/// # }
/// ```
pub fn spawn_copy(
    source: impl Into<PathBuf>,
    destination: impl Into<PathBuf>,
    options: CopyOptions,
) -> CopyHandle {
    let (sender, progress) = watch::channel(None);
    let options = options.observe_also(Arc::new(move |record: &ProgressRecord| {
        sender.send_replace(Some(record.clone()));
    }));

    let (source, destination) = (source.into(), destination.into());
    let task = tokio::spawn(async move { copy_file(&source, &destination, &options).await });

    CopyHandle { task, progress }
}

// =============================================================================
// Tests
// =============================================================================
