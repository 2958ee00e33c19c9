//! Recall worker: the caller-side flow around a store.
//!
//! Handles requests from a front end, applies the frecency score model on
//! every use and returns serializable responses.

mod handler;
mod messages;

pub use handler::RecallWorker;
pub use messages::{Request, Response};
