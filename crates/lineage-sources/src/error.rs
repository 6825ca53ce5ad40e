//! Error types for the lineage-sources parsers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("line {line}: malformed {what}: {content:?}")]
  Malformed {
    line:    usize,
    what:    &'static str,
    content: String,
  },

  #[error("missing column {0:?}")]
  MissingColumn(String),

  #[error("line {line}: invalid code point {value:?}")]
  InvalidCodePoint { line: usize, value: String },

  #[error("could not read {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Core(#[from] lineage_core::Error),
}

impl Error {
  pub(crate) fn malformed(line: usize, what: &'static str, content: &str) -> Self {
    Self::Malformed { line, what, content: content.to_owned() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
