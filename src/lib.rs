//! Rummage: recall Go packages by fragments of their path.
//!
//! Rummage remembers the third-party package paths a developer has fetched
//! and ranks them by "frecency" (frequency + recency), so that typing `mux`
//! is enough to get back to `github.com/gorilla/mux`.
//!
//! This crate is the engine behind such a tool:
//! - A persistent store of entries (SQLite or JSON file)
//! - A two-regime frecency score model
//! - Literal substring queries ranked by score
//! - A request/response worker that applies the score model on every use
//! - Discovery of packages already present in the Go module cache
//!
//! Argument parsing, running `go get` and printing are left to the front end.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Front end (CLI, editor plugin)                     │  ← not in this crate
//! └─────────────────────────────────────────────────────┘
//!                        │ Request / Response
//! ┌─────────────────────────────────────────────────────┐
//! │  Worker Layer (worker/)                             │
//! │  - Resolve fragments, record uses                   │
//! │  - Apply the frecency score model                   │
//! └─────────────────────────────────────────────────────┘
//!         │                                   │
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │ Storage Layer (storage/)  │   │ Infrastructure            │
//! │ - Store trait             │   │ (infrastructure/)         │
//! │ - SQLite / JSON backends  │   │ - Module cache discovery  │
//! │ - Frecency score model    │   │                           │
//! └───────────────────────────┘   └───────────────────────────┘
//!         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Entry model, package path validation             │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: TOML configuration
//! - [`domain`]: Core domain types (Entry, errors)
//! - [`storage`]: Store trait, backends and score model
//! - [`worker`]: Request handling on top of a store
//! - [`infrastructure`]: Go module cache discovery
//! - [`observability`]: Tracing subscriber setup
//!
//! # Examples
//!
//! ```rust
//! use rummage::storage::{calculate_score, SqliteStore, Store};
//!
//! let mut store = SqliteStore::open_in_memory()?;
//! store.add("github.com/gorilla/mux")?;
//! store.add("github.com/go-chi/chi")?;
//!
//! // The caller records a use: recompute, then write back.
//! let hit = store.highest_score_match("mux")?;
//! let now = chrono::Utc::now().timestamp();
//! let updated = store.update(&hit.path, calculate_score(&hit, now), now)?;
//! assert_eq!(updated.score, 5.0);
//! # Ok::<(), rummage::RummageError>(())
//! ```
//!
//! ## Worker Usage
//!
//! ```rust
//! use rummage::storage::open_store;
//! use rummage::worker::{RecallWorker, Request, Response};
//! use rummage::Config;
//!
//! let dir = tempfile::tempdir()?;
//! let config = Config::new(dir.path());
//! let mut worker = RecallWorker::new(open_store(&config)?, &config);
//!
//! worker.handle(Request::Resolve { query: "github.com/gorilla/mux".to_string() });
//! match worker.handle(Request::Resolve { query: "mux".to_string() }) {
//!     Response::Entry { entry } => assert_eq!(entry.path, "github.com/gorilla/mux"),
//!     other => panic!("{other:?}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod worker;

pub use config::{Backend, Config};
pub use domain::{BatchError, Entry, Result, RummageError};
pub use storage::{calculate_score, open_store, Store};
