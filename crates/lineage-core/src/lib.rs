//! Core types for the script lineage knowledge base.
//!
//! Code points, scripts, the closed derivation/certainty lookups, the
//! in-memory catalog and derivation multi-graph, the embedded script-family
//! configuration, and the [`LineageStore`](store::LineageStore) seam that
//! storage backends implement. No I/O and no database dependencies.

pub mod catalog;
pub mod code_point;
pub mod defaults;
pub mod derivation;
pub mod error;
pub mod family;
pub mod graph;
pub mod script;
pub mod store;

pub use error::{Error, Result};
