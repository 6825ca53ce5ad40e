//! Ad-hoc row queries, used for saved queries and reports.

use std::fmt;

use rusqlite::types::ValueRef;
use serde::Serialize;

/// One SQLite value, owned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Cell {
  fn from(value: ValueRef<'_>) -> Self {
    match value {
      ValueRef::Null => Self::Null,
      ValueRef::Integer(i) => Self::Integer(i),
      ValueRef::Real(f) => Self::Real(f),
      ValueRef::Text(t) => Self::Text(String::from_utf8_lossy(t).into_owned()),
      ValueRef::Blob(b) => Self::Blob(b.to_vec()),
    }
  }
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => f.write_str("NULL"),
      Self::Integer(i) => write!(f, "{i}"),
      Self::Real(r) => write!(f, "{r}"),
      Self::Text(t) => f.write_str(t),
      Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
    }
  }
}

/// Column names plus every returned row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<Cell>>,
}
