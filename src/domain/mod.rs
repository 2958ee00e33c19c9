//! Domain layer for rummage.
//!
//! Core types independent of any storage backend.
//!
//! - [`error`]: Error types and result aliases
//! - [`entry`]: Entry model and package-path validation

pub mod entry;
pub mod error;

pub use entry::{is_package_path, Entry, INITIAL_SCORE};
pub use error::{BatchError, Result, RummageError};
