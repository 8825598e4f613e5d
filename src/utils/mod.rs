//! Internal helpers shared by the copy pipelines.

pub(crate) mod path;
