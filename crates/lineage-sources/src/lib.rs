//! Readers for the knowledge base's input files.
//!
//! Every parser takes the file's full text and returns plain records; the
//! pipeline in `lineage-loader` decides what to do with them. Pure and
//! synchronous apart from the two small file helpers below.

pub mod alphabet;
pub mod csv;
pub mod curated;
pub mod error;
pub mod iso15924;
pub mod private_use;
pub mod ucd;
pub mod unihan;
pub mod wikitext;

use std::{io, path::Path};

pub use error::{Error, Result};

/// Read a required input file.
pub fn read(path: &Path) -> Result<String> {
  std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })
}

/// Read an optional input file. A missing file is `Ok(None)`.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
  match std::fs::read_to_string(path) {
    Ok(text) => Ok(Some(text)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => Err(Error::Io { path: path.to_owned(), source }),
  }
}

/// Parse a bare hexadecimal scalar value such as `0915` or `11F12`.
pub fn parse_scalar(hex: &str) -> Option<u32> {
  let hex = hex.trim();
  if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
    return None;
  }
  u32::from_str_radix(hex, 16).ok().filter(|v| char::from_u32(*v).is_some())
}
