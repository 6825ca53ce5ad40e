//! [`Database`]: a configured SQLite knowledge base with its resource and
//! saved-query directories.

use std::path::PathBuf;

use lineage_core::family::Families;
use lineage_store_sqlite::{QueryResult, SqliteStore};

use crate::{
  Error, LineageConfig, Resources, Result,
  pipeline::{LoadOptions, LoadReport, run_load},
  queries, report,
};

const STATISTICS_QUERY: &str = "Total derivation statistics";

pub struct Database {
  store:         SqliteStore,
  store_path:    PathBuf,
  resource_path: PathBuf,
  query_path:    PathBuf,
  families:      Families,
}

impl Database {
  /// Open (or create) the store named by `config`.
  pub fn open(config: &LineageConfig) -> Result<Self> {
    let families = config.families()?;
    let store = SqliteStore::open(&config.store_path).map_err(Error::store)?;
    Ok(Self {
      store,
      store_path: config.store_path.clone(),
      resource_path: config.resource_path.clone(),
      query_path: config.query_path.clone(),
      families,
    })
  }

  pub fn store(&self) -> &SqliteStore { &self.store }

  pub fn families(&self) -> &Families { &self.families }

  /// Rebuild the knowledge base from the resource directory.
  ///
  /// Path overrides in `options` stick for later calls on this handle.
  pub fn load(&mut self, options: &LoadOptions) -> Result<LoadReport> {
    if let Some(path) = &options.resource_path {
      self.resource_path = path.clone();
    }
    if let Some(path) = &options.query_path {
      self.query_path = path.clone();
    }
    if options.force_overwrite {
      // release the file before it is deleted
      let scratch = SqliteStore::open_in_memory().map_err(Error::store)?;
      drop(std::mem::replace(&mut self.store, scratch));
      self.store = SqliteStore::recreate(&self.store_path).map_err(Error::store)?;
    }

    let resources = Resources::new(&self.resource_path);
    run_load(&mut self.store, &resources, &self.families, options)
  }

  // ── Saved queries ─────────────────────────────────────────────────────

  /// Run the saved query whose file name starts with `prefix`.
  pub fn saved_query(&self, prefix: &str, params: &[String]) -> Result<QueryResult> {
    let sql = queries::load(&self.query_path, prefix)?;
    self.store.query(&sql, params).map_err(Error::store)
  }

  pub fn pretty_saved_query(&self, prefix: &str, params: &[String]) -> Result<String> {
    Ok(report::format_table(&self.saved_query(prefix, params)?))
  }

  /// Coverage table for `load`, followed by the derivation statistics query
  /// when the query directory has one.
  pub fn debug_report(&self, load: &LoadReport) -> Result<String> {
    let mut out = report::format_coverage(&load.coverage);
    match self.pretty_saved_query(STATISTICS_QUERY, &[]) {
      Ok(table) => {
        out.push('\n');
        out.push_str(&table);
      }
      Err(Error::NoSuchQuery { .. } | Error::Io { .. }) => {
        tracing::debug!(query = STATISTICS_QUERY, "statistics query not found");
      }
      Err(e) => return Err(e),
    }
    Ok(out)
  }
}
