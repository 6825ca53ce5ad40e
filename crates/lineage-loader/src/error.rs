//! Error types for the load pipeline and saved queries.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{path}: {source}")]
  Source {
    path:   PathBuf,
    #[source]
    source: lineage_sources::Error,
  },

  #[error(transparent)]
  Core(#[from] lineage_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("{context}: unknown script {label:?}")]
  UnknownScript { context: String, label: String },

  #[error("{path}:{line}: {value:?} is not a single character")]
  NotACharacter {
    path:  PathBuf,
    line:  usize,
    value: String,
  },

  #[error("{path}:{line}: {character} (U+{id:04X}) is not catalogued")]
  Uncatalogued {
    path:      PathBuf,
    line:      usize,
    character: char,
    id:        u32,
  },

  #[error("{path}:{line}: {character} (U+{id:04X}) belongs to {actual}, not {expected}")]
  WrongScript {
    path:      PathBuf,
    line:      usize,
    character: char,
    id:        u32,
    expected:  String,
    actual:    String,
  },

  #[error("{path}:{line}: attempted to add self-derivation of {character} (U+{id:04X})")]
  SelfDerivation {
    path:      PathBuf,
    line:      usize,
    character: char,
    id:        u32,
  },

  #[error("{path}:{line}: {child} → {parent} would close a cycle with an existing edge")]
  TwoCycle {
    path:   PathBuf,
    line:   usize,
    child:  char,
    parent: char,
  },

  #[error("{path}: malformed code point {value:?} for tag {tag:?}")]
  MalformedCognate {
    path:  PathBuf,
    tag:   String,
    value: String,
  },

  #[error("derivation graph failed verification: {0}")]
  Integrity(String),

  #[error("no query named {prefix:?} found in {dir}")]
  NoSuchQuery { prefix: String, dir: PathBuf },

  #[error("multiple matching queries found: {}", matches.join(", "))]
  AmbiguousQuery { prefix: String, matches: Vec<String> },

  #[error("could not access {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub(crate) fn in_file(path: impl Into<PathBuf>) -> impl FnOnce(lineage_sources::Error) -> Self {
    let path = path.into();
    move |source| Self::Source { path, source }
  }

  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
    let path = path.into();
    move |source| Self::Io { path, source }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
