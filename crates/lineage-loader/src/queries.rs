//! Saved SQL queries, one per file, looked up by file-name prefix.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The single file in `dir` whose name starts with `prefix`.
pub fn find(dir: &Path, prefix: &str) -> Result<PathBuf> {
  let mut matches = Vec::new();
  for entry in std::fs::read_dir(dir).map_err(Error::io(dir))? {
    let entry = entry.map_err(Error::io(dir))?;
    let name = entry.file_name().to_string_lossy().into_owned();
    if name.starts_with(prefix) && entry.path().is_file() {
      matches.push(name);
    }
  }
  matches.sort();

  match matches.as_slice() {
    [] => Err(Error::NoSuchQuery { prefix: prefix.to_owned(), dir: dir.to_owned() }),
    [name] => Ok(dir.join(name)),
    _ => Err(Error::AmbiguousQuery { prefix: prefix.to_owned(), matches }),
  }
}

/// Read the SQL text of the saved query matching `prefix`.
pub fn load(dir: &Path, prefix: &str) -> Result<String> {
  let path = find(dir, prefix)?;
  std::fs::read_to_string(&path).map_err(Error::io(path))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["Get Character Ancestors.sql", "Get Character Descendants.sql", "Total.sql"] {
      std::fs::write(dir.path().join(name), "SELECT 1").unwrap();
    }
    dir
  }

  #[test]
  fn unique_prefix_resolves() {
    let dir = dir();
    let path = find(dir.path(), "Get Character A").unwrap();
    assert!(path.ends_with("Get Character Ancestors.sql"));
    assert_eq!(load(dir.path(), "Tot").unwrap(), "SELECT 1");
  }

  #[test]
  fn missing_and_ambiguous_prefixes_fail() {
    let dir = dir();
    assert!(matches!(find(dir.path(), "Nope"), Err(Error::NoSuchQuery { .. })));
    match find(dir.path(), "Get") {
      Err(Error::AmbiguousQuery { matches, .. }) => assert_eq!(matches.len(), 2),
      other => panic!("expected ambiguity, got {other:?}"),
    }
  }
}
