//! Structured logging setup.
//!
//! Library code only emits `tracing` spans and events. A front end calls
//! [`init_tracing`] once to send them to `<data_dir>/rummage.log`.
//!
//! # Configuration
//!
//! The filter is chosen from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `log_level` in [`crate::Config`]
//! 3. Default: `"info"`

mod init;

pub use init::init_tracing;
