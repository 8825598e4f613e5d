//! Copy strategy selection.
//!
//! A transfer first tries a clone when [`CloneMode`] allows it. When the
//! clone is skipped or refused in `Auto` mode, the data is moved by the
//! pipeline of the calling mode: [`Strategy::Buffered`] for blocking calls,
//! [`Strategy::Streamed`] for async ones.
//!
//! The overwrite policy is enforced here, at the moment the destination is
//! opened: with `overwrite = false` the open is exclusive and an existing
//! destination turns the transfer into [`Transfer::Skipped`].

use super::buffer::buffered_copy;
use super::reflink::{CloneAttempt, attempt_clone};
use super::stream::streamed_copy;
use super::utils::{blocking, destination_options, is_skip};
use crate::error::{Error, Result};
use crate::options::{CloneMode, CopyOptions};
use crate::progress::ProgressTracker;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// How the bytes of a file reached the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Filesystem clone; no data was read
    Reflink,
    /// Concurrent reader/writer pipeline (async calls)
    Streamed,
    /// Single fixed buffer loop (blocking calls)
    Buffered,
}

/// Result of the data phase of a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    Copied { bytes: u64, strategy: Strategy },
    Skipped,
}

/// Turn a clone attempt into a finished transfer, or `None` to fall through.
fn settle_clone(
    attempt: CloneAttempt,
    mode: CloneMode,
    destination: &Path,
    tracker: &mut ProgressTracker,
) -> Result<Option<Transfer>> {
    match attempt {
        CloneAttempt::Cloned => {
            tracker.finish();
            Ok(Some(Transfer::Copied {
                bytes: tracker.size(),
                strategy: Strategy::Reflink,
            }))
        }
        CloneAttempt::Exists => Ok(Some(Transfer::Skipped)),
        CloneAttempt::Failed(source) if mode == CloneMode::Force => Err(Error::Clone {
            path: destination.to_path_buf(),
            source,
        }),
        CloneAttempt::Failed(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "clone to {} refused, copying data instead: {}",
                destination.display(),
                _e
            );
            Ok(None)
        }
    }
}

fn read_error(source: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |e| Error::Read {
        path: source.to_path_buf(),
        source: e,
    }
}

fn write_error(destination: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |e| Error::Write {
        path: destination.to_path_buf(),
        source: e,
    }
}

/// Move the data of `source` to `destination` (blocking).
pub(crate) fn transfer_blocking(
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
    tracker: &mut ProgressTracker,
) -> Result<Transfer> {
    if let Some(attempt) = attempt_clone(source, destination, options.clone, options.overwrite) {
        if let Some(transfer) = settle_clone(attempt, options.clone, destination, tracker)? {
            return Ok(transfer);
        }
    }

    let mut reader = File::open(source).map_err(read_error(source))?;
    let mut writer = match destination_options(options.overwrite).open(destination) {
        Ok(file) => file,
        Err(e) if is_skip(&e, options.overwrite) => return Ok(Transfer::Skipped),
        Err(e) => return Err(write_error(destination)(e)),
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "buffered copy {} -> {} ({} bytes)",
        source.display(),
        destination.display(),
        tracker.size()
    );

    let bytes = buffered_copy(&mut reader, &mut writer, source, destination, tracker)?;
    if options.fsync {
        writer.sync_all().map_err(write_error(destination))?;
    }
    drop(writer);
    drop(reader);

    tracker.finish();
    Ok(Transfer::Copied {
        bytes,
        strategy: Strategy::Buffered,
    })
}

/// Move the data of `source` to `destination` (async).
pub(crate) async fn transfer_async(
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
    tracker: &mut ProgressTracker,
) -> Result<Transfer> {
    if options.clone != CloneMode::Disabled {
        let (src, dst): (PathBuf, PathBuf) = (source.to_path_buf(), destination.to_path_buf());
        let (mode, overwrite) = (options.clone, options.overwrite);
        let attempt = blocking(move || Ok(attempt_clone(&src, &dst, mode, overwrite))).await?;
        if let Some(attempt) = attempt {
            if let Some(transfer) = settle_clone(attempt, options.clone, destination, tracker)? {
                return Ok(transfer);
            }
        }
    }

    let mut reader = tokio::fs::File::open(source)
        .await
        .map_err(read_error(source))?;
    let open = tokio::fs::OpenOptions::from(destination_options(options.overwrite));
    let mut writer = match open.open(destination).await {
        Ok(file) => file,
        Err(e) if is_skip(&e, options.overwrite) => return Ok(Transfer::Skipped),
        Err(e) => return Err(write_error(destination)(e)),
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "streamed copy {} -> {} ({} bytes)",
        source.display(),
        destination.display(),
        tracker.size()
    );

    let bytes = streamed_copy(&mut reader, &mut writer, source, destination, tracker).await?;
    if options.fsync {
        writer.sync_all().await.map_err(write_error(destination))?;
    }
    drop(writer);
    drop(reader);

    tracker.finish();
    Ok(Transfer::Copied {
        bytes,
        strategy: Strategy::Streamed,
    })
}
