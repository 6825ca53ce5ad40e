//! Error type for `lineage-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lineage_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("could not remove {path}: {source}")]
  Remove {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("stored id {0} is not a Unicode scalar value")]
  InvalidCodePoint(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
