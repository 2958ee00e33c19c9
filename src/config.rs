//! Configuration for opening and querying a store.
//!
//! Configuration is usually read from a TOML file:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/rummage"
//! backend = "sqlite"        # or "json"
//! query_limit = 10
//! singleton_shortcut = true
//! log_level = "debug"
//! ```
//!
//! Only `data_dir` is required. Locating the file (and the data directory)
//! is left to the caller.

use crate::domain::error::{Result, RummageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of rows returned by a ranked query.
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite database `rummage.db`.
    #[default]
    Sqlite,

    /// JSON file `rummage.json`.
    Json,
}

impl Backend {
    /// File name of the store inside the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Sqlite => "rummage.db",
            Self::Json => "rummage.json",
        }
    }
}

/// Settings shared by the store, the worker and tracing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the store file and the log file.
    pub data_dir: PathBuf,

    /// Which backend to open. Default: `sqlite`
    #[serde(default)]
    pub backend: Backend,

    /// Rows returned by a ranked query when the caller gives no limit. Default: 10
    #[serde(default = "default_query_limit")]
    pub query_limit: usize,

    /// Return the only entry of a single-entry store from
    /// `highest_score_match` even if it does not contain the query. Default: `true`
    #[serde(default = "default_singleton_shortcut")]
    pub singleton_shortcut: bool,

    /// Tracing filter, e.g. `info` or `rummage=debug`. `RUST_LOG` wins over it.
    #[serde(default)]
    pub log_level: Option<String>,
}

const fn default_query_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

const fn default_singleton_shortcut() -> bool {
    true
}

impl Config {
    /// Creates a configuration with defaults for everything but the data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: Backend::default(),
            query_limit: DEFAULT_QUERY_LIMIT,
            singleton_shortcut: true,
            log_level: None,
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RummageError::Config`] if the text is not valid TOML or
    /// misses `data_dir`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rummage::config::{Backend, Config};
    ///
    /// let config = Config::from_toml_str("data_dir = \"/tmp/rummage\"\nbackend = \"json\"")?;
    /// assert_eq!(config.backend, Backend::Json);
    /// assert_eq!(config.query_limit, 10);
    /// # Ok::<(), rummage::RummageError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RummageError::Config(format!("failed to parse TOML: {e}")))
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RummageError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RummageError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Full path of the store file for the selected backend.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(self.backend.file_name())
    }

    /// Full path of the log file.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("rummage.log")
    }
}
