//! Cognate-letter tables: which characters each script uses for each letter
//! class of a family, read from one wikitext table per letter.

use std::collections::{BTreeMap, HashMap, HashSet};

use lineage_core::family::LetterFamily;
use lineage_sources::wikitext::{self, EntryValue};
use tracing::{debug, info, warn};

use crate::{Error, Resources, Result};

/// What one script shows for one letter class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterCell {
  /// Encoded characters in first-seen order, without repeats.
  pub chars:  Vec<char>,
  /// Images of unencoded glyphs. Empty whenever `chars` is not.
  pub images: Vec<String>,
}

impl LetterCell {
  /// The script has the letter, encoded or not.
  pub fn is_attested(&self) -> bool { !self.chars.is_empty() || !self.images.is_empty() }

  fn push_char(&mut self, ch: char) -> bool {
    if self.chars.contains(&ch) {
      return false;
    }
    self.chars.push(ch);
    true
  }
}

/// Every cell of one family, keyed by script code and letter ordinal.
#[derive(Debug, Clone, Default)]
pub struct CognateTable {
  family: String,
  cells:  BTreeMap<String, BTreeMap<u32, LetterCell>>,
}

impl CognateTable {
  pub fn new(family: impl Into<String>) -> Self {
    Self { family: family.into(), cells: BTreeMap::new() }
  }

  pub fn family(&self) -> &str { &self.family }

  /// The cell for `script_code` and the letter at `ordinal`, if the script
  /// had any entry for it.
  pub fn cell(&self, script_code: &str, ordinal: u32) -> Option<&LetterCell> {
    self.cells.get(script_code)?.get(&ordinal)
  }

  pub fn chars(&self, script_code: &str, ordinal: u32) -> &[char] {
    self.cell(script_code, ordinal).map(|cell| cell.chars.as_slice()).unwrap_or_default()
  }

  /// Record an entry for the letter, creating the cell if needed.
  pub fn insert_cell(&mut self, script_code: &str, ordinal: u32, cell: LetterCell) {
    self.cells.entry(script_code.to_owned()).or_default().insert(ordinal, cell);
  }

  /// Add `ch` to a cell. Returns `false` if it was already there.
  pub fn add_char(&mut self, script_code: &str, ordinal: u32, ch: char) -> bool {
    let cell = self.cells.entry(script_code.to_owned()).or_default().entry(ordinal).or_default();
    cell.images.clear();
    cell.push_char(ch)
  }

  /// Script codes with at least one entry, in code order.
  pub fn scripts(&self) -> impl Iterator<Item = &str> { self.cells.keys().map(String::as_str) }

  /// Every character of `script_code`, in letter order.
  pub fn script_chars(&self, script_code: &str) -> Vec<char> {
    self
      .cells
      .get(script_code)
      .map(|letters| letters.values().flat_map(|cell| cell.chars.iter().copied()).collect())
      .unwrap_or_default()
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Read every letter table of `family`.
///
/// A missing table leaves its letter empty. A malformed code point entry is
/// fatal when `verify` is set and skipped otherwise.
pub fn load(resources: &Resources, family: &LetterFamily, verify: bool) -> Result<CognateTable> {
  let mut table = CognateTable::new(&family.name);
  let mut seen: HashMap<String, HashSet<char>> = HashMap::new();

  for (ordinal, letter) in (0..).zip(&family.letters) {
    let path = resources.letter_table(&family.table_dir, letter);
    let Some(text) = lineage_sources::read_optional(&path).map_err(Error::in_file(&path))? else {
      info!(family = %family.name, %letter, "no cognate table");
      continue;
    };

    let mut cells: BTreeMap<String, LetterCell> = BTreeMap::new();
    for entry in wikitext::parse_table(&text) {
      let code = family.script_code(&entry.tag);
      if code.is_empty() {
        continue;
      }
      let cell = cells.entry(code.clone()).or_default();
      match &entry.value {
        EntryValue::CodePoint(hex) => match entry.scalar() {
          Some(ch) => {
            cell.push_char(ch);
          }
          None if verify => {
            return Err(Error::MalformedCognate { path, tag: entry.tag.clone(), value: hex.clone() });
          }
          None => debug!(%letter, tag = %entry.tag, value = %hex, "skipping malformed code point"),
        },
        EntryValue::Image(name) => match family.image_equivalent(&code, letter) {
          Some(ch) => {
            cell.push_char(ch);
          }
          None => cell.images.push(name.clone()),
        },
        EntryValue::Empty => {}
      }
    }

    for (code, mut cell) in cells {
      if !cell.chars.is_empty() {
        cell.images.clear();
      }
      let seen = seen.entry(code.clone()).or_default();
      cell.chars.retain(|&ch| {
        let fresh = seen.insert(ch);
        if !fresh && verify {
          warn!(script = %code, %letter, %ch, "character already listed under an earlier letter");
        }
        fresh
      });
      table.insert_cell(&code, ordinal, cell);
    }
  }

  info!(family = %family.name, scripts = table.cells.len(), "cognate tables loaded");
  Ok(table)
}
