//! SQLite backend for the lineage knowledge base.
//!
//! Wraps a single [`rusqlite::Connection`]. Each pipeline stage is written in
//! its own transaction.

mod encode;
mod query;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use query::{Cell, QueryResult};
pub use store::SqliteStore;
