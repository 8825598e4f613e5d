//! Core copy operations.
//!
//! This module provides the single file copy engine: the orchestrator in
//! `file`, strategy selection and the three strategies (clone, streamed,
//! fixed buffer), and attribute preservation.

mod attrs;
mod buffer;
mod file;
mod reflink;
mod strategy;
mod stream;
mod utils;

// Re-export public API
pub use buffer::BUFFER_SIZE;
pub use file::{CopyHandle, CopyOutcome, copy_file, copy_file_sync, spawn_copy};
pub use strategy::Strategy;
