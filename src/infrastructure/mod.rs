//! Infrastructure layer for filesystem interactions.
//!
//! Currently this is discovery of packages already present in the local Go
//! module cache, used to populate a store in bulk.

pub mod modcache;

pub use modcache::{module_path, scan_module_cache, unescape};
