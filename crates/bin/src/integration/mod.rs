//! Glue between the CLI and the library crates: cache location and batch runs.

pub(crate) mod batch;
pub(crate) mod cache_manager;
