//! Progress reporting.
//!
//! A copy reports its progress as a sequence of [`ProgressRecord`]s handed
//! to the [`ProgressCallback`] registered in
//! [`CopyOptions::on_progress`](crate::CopyOptions::on_progress). Within one
//! copy `written_bytes` never decreases, and the last record always has
//! `written_bytes == size`. An empty source produces exactly one record.
//!
//! With the `progress` feature, [`create_progress_bar`] and
//! [`progress_bar_callback`] connect the records to an indicatif bar.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Callback for progress updates
pub type ProgressCallback = Arc<dyn Fn(&ProgressRecord) + Send + Sync>;

/// One progress notification.
///
/// With the `serde` feature the record serializes with the field names
/// `sourcePath`, `destinationPath`, `size`, `writtenBytes` and `percent`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProgressRecord {
    /// Absolute source path
    pub source_path: PathBuf,
    /// Absolute destination path
    pub destination_path: PathBuf,
    /// Source size in bytes, as seen by the initial stat
    pub size: u64,
    /// Bytes written so far
    pub written_bytes: u64,
    /// Fraction done, between `0.0` and `1.0`
    pub percent: f64,
}

impl ProgressRecord {
    pub(crate) fn new(
        source_path: PathBuf,
        destination_path: PathBuf,
        size: u64,
        written_bytes: u64,
    ) -> Self {
        let percent = if written_bytes == size {
            1.0
        } else {
            written_bytes as f64 / size as f64
        };
        Self {
            source_path,
            destination_path,
            size,
            written_bytes,
            percent,
        }
    }

    /// Whether this is the record of a completed transfer.
    pub fn is_complete(&self) -> bool {
        self.written_bytes == self.size
    }
}

/// Per-copy progress state.
///
/// Owned by exactly one in-flight copy and written only by the strategy
/// running it. Counts are clamped to `size` so a source that grows during
/// the copy cannot push the count past the final record.
pub(crate) struct ProgressTracker {
    source_path: PathBuf,
    destination_path: PathBuf,
    size: u64,
    written: u64,
    observer: Option<ProgressCallback>,
}

impl ProgressTracker {
    pub(crate) fn new(
        source_path: &Path,
        destination_path: &Path,
        observer: Option<ProgressCallback>,
    ) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            destination_path: destination_path.to_path_buf(),
            size: 0,
            written: 0,
            observer,
        }
    }

    pub(crate) fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    /// Record the writer's running byte count. Emits only on growth.
    pub(crate) fn update(&mut self, written: u64) {
        let written = written.min(self.size);
        if written > self.written {
            self.written = written;
            self.emit();
        }
    }

    /// Mark the transfer complete. Always emits exactly one record.
    pub(crate) fn finish(&mut self) {
        self.written = self.size;
        self.emit();
    }

    fn emit(&self) {
        if let Some(observer) = &self.observer {
            observer(&ProgressRecord::new(
                self.source_path.clone(),
                self.destination_path.clone(),
                self.size,
                self.written,
            ));
        }
    }
}

#[cfg(feature = "progress")]
mod bar {
    use super::{ProgressCallback, ProgressRecord};
    use indicatif::{ProgressBar, ProgressStyle};
    use std::sync::Arc;

    /// Create a default byte progress bar for a file copy
    #[must_use]
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    }

    /// Drive `bar` from progress records
    #[must_use]
    pub fn progress_bar_callback(bar: ProgressBar) -> ProgressCallback {
        Arc::new(move |record: &ProgressRecord| {
            bar.set_length(record.size);
            bar.set_position(record.written_bytes);
        })
    }
}

#[cfg(feature = "progress")]
pub use bar::{create_progress_bar, progress_bar_callback};
