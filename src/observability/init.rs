//! Tracing initialization and subscriber setup.

use crate::Config;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor the config sets one.
const DEFAULT_LEVEL: &str = "info";

/// Installs a global fmt subscriber writing to the configured log file.
///
/// The file is opened in append mode and the data directory is created if
/// needed. Logging is optional: if the file cannot be opened, or a global
/// subscriber is already installed, this does nothing.
///
/// # Example
///
/// ```rust
/// use rummage::observability::init_tracing;
/// use rummage::Config;
///
/// let dir = std::env::temp_dir().join("rummage-doc");
/// let mut config = Config::new(&dir);
/// config.log_level = Some("debug".to_string());
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
    else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_target(true)
        .with_ansi(false)
        .try_init();
}
