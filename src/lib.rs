//! # cpfile
//!
//! Copy a single file, async or blocking, with progress and metadata.
//!
//! ## Core Features
//!
//! - **Two modes, one contract**: [`copy_file`] runs on tokio, [`copy_file_sync`] blocks; both
//!   report the same outcomes and the same error codes
//! - **Progress**: a callback receives [`ProgressRecord`]s whose `written_bytes` never decreases
//!   and whose last record is always 100%
//! - **No-clobber mode**: exclusive create at open time, never a racy existence check
//! - **Reflink support**: instant copy-on-write on btrfs/XFS/APFS, with automatic fallback
//! - **Metadata preserving**: access/modification times, permission bits, optionally owner/group
//! - **Parent creation**: missing destination directories are created with a configurable mode
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use cpfile::CopyBuilder;
//!
//! let outcome = CopyBuilder::new("input.bin", "backup/input.bin").run_sync()?;
//! println!("Copied {} bytes", outcome.bytes());
//! # Ok::<(), cpfile::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use cpfile::{CloneMode, CopyOptions, CopyOutcome, copy_file};
//!
//! # async fn run() -> cpfile::Result<()> {
//! let options = CopyOptions::default()
//!     .without_overwrite()                      // Keep an existing destination
//!     .with_clone_mode(CloneMode::Disabled)     // Always copy the bytes
//!     .with_progress(|p| println!("{:.1}%", p.percent * 100.0));
//!
//! match copy_file("input.bin", "output.bin", &options).await? {
//!     CopyOutcome::Copied { bytes, strategy } => println!("{bytes} bytes via {strategy:?}"),
//!     CopyOutcome::SkippedExists => println!("output.bin already exists"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every [`Error`] carries the path it pertains to and keeps the OS error as
//! its source. [`Error::code`] gives the errno name (`"ENOENT"`, `"EISDIR"`,
//! `"ENOSPC"`, ...) so callers can branch without matching on messages.
//!
//! ## Limitations
//!
//! - Only regular files are copied; a directory source fails with `EISDIR`
//! - There is no temp-file + rename step, so a failure mid-transfer can leave
//!   a partially written destination
//! - A running copy cannot be cancelled
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`], [`ProgressRecord`] and [`CopyOutcome`] |
//! | `reflink` | Copy-on-write clones on Linux and macOS |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod options;
mod progress;
mod utils;

pub use builder::CopyBuilder;
pub use copy::{
    BUFFER_SIZE, CopyHandle, CopyOutcome, Strategy, copy_file, copy_file_sync, spawn_copy,
};
pub use error::{Attribute, Error, ErrorKind, Result, is_no_space_error};
pub use options::{CloneMode, CopyOptions};
pub use progress::{ProgressCallback, ProgressRecord};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::{create_progress_bar, progress_bar_callback};
