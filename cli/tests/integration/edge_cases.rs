//! Edge case integration tests for cpf CLI.
//!
//! These tests cover edge cases:
//! - Symlinked sources and destinations
//! - Timestamp and permission preservation
//! - Special filenames and buffer boundary sizes

#[path = "edge_cases/boundary_cases.rs"]
mod boundary_cases;


#[path = "edge_cases/timestamp_preservation.rs"]
mod timestamp_preservation;
