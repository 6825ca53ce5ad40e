//! The lineage load pipeline.
//!
//! Reads a resource directory, builds the script registry, the code-point
//! catalog and the derivation graph in memory, and persists each stage
//! through any [`LineageStore`](lineage_core::store::LineageStore). Also
//! hosts saved-query lookup and the plain-text table printer used by the
//! `lineage` binary.

pub mod audit;
pub mod catalog;
pub mod cognate;
pub mod database;
pub mod derive;
pub mod error;
pub mod pipeline;
pub mod queries;
pub mod report;
pub mod resources;
pub mod synthesize;

pub use database::Database;
pub use error::{Error, Result};
pub use pipeline::{LoadOptions, LoadReport, run_load};
pub use resources::Resources;

use std::path::PathBuf;

use lineage_core::family::Families;
use serde::Deserialize;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `lineage.toml` and `LINEAGE_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct LineageConfig {
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  #[serde(default = "default_resource_path")]
  pub resource_path: PathBuf,
  #[serde(default = "default_query_path")]
  pub query_path:    PathBuf,
  /// Replacement for the built-in script-family document.
  #[serde(default)]
  pub families_path: Option<PathBuf>,
}

impl LineageConfig {
  /// The configured script families, validated.
  pub fn families(&self) -> Result<Families> {
    let families = match &self.families_path {
      Some(path) => {
        let text = std::fs::read_to_string(path).map_err(Error::io(path))?;
        Families::from_toml(&text)?
      }
      None => Families::builtin()?,
    };
    Ok(families)
  }
}

impl Default for LineageConfig {
  fn default() -> Self {
    Self {
      store_path:    default_store_path(),
      resource_path: default_resource_path(),
      query_path:    default_query_path(),
      families_path: None,
    }
  }
}

fn default_store_path() -> PathBuf { PathBuf::from("lineage.db") }

fn default_resource_path() -> PathBuf { PathBuf::from("resource") }

fn default_query_path() -> PathBuf { PathBuf::from("queries") }
