//! Hand-curated derivation files: `derivations/defaults.csv` and one
//! `derivations/<Script>.csv` per script.
//!
//! Cells are returned raw (trimmed, blank as `None`). Defaulting and lookup
//! resolution happen in the loader.

use std::collections::BTreeMap;

use crate::{csv::Table, error::Result};

/// Script-wide fallbacks for curated rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptDefaults {
  pub source:          Option<String>,
  pub derivation_type: Option<String>,
  pub certainty:       Option<String>,
  pub notes:           Option<String>,
}

/// Parse `defaults.csv` into a map keyed by the `Script` label as written.
pub fn parse_defaults(input: &str) -> Result<BTreeMap<String, ScriptDefaults>> {
  let table = Table::parse(input)?;
  table.require(&["Script"])?;

  let mut defaults = BTreeMap::new();
  for record in table.records() {
    let Some(script) = record.value("Script") else { continue };
    defaults.insert(script.to_owned(), ScriptDefaults {
      source:          owned(record.value("Source")),
      derivation_type: owned(record.value("Derivation Type")),
      certainty:       owned(record.value("Certainty Type")),
      notes:           owned(record.value("Notes")),
    });
  }
  Ok(defaults)
}

/// One row of a per-script derivation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuratedRow {
  pub line:            usize,
  pub child:           String,
  /// `None` for a blank parent cell. May hold several `/`-separated parents.
  pub parent:          Option<String>,
  /// May hold several `/`-separated types.
  pub derivation_type: Option<String>,
  pub certainty:       Option<String>,
  pub source:          Option<String>,
  pub notes:           Option<String>,
}

impl CuratedRow {
  /// The parent cell split on `/`; empty for a blank parent.
  pub fn parents(&self) -> Vec<&str> { split_slash(self.parent.as_deref()) }
}

/// Split a `/`-separated cell, dropping empty pieces.
pub fn split_slash(cell: Option<&str>) -> Vec<&str> {
  cell
    .map(|c| c.split('/').map(str::trim).filter(|p| !p.is_empty()).collect())
    .unwrap_or_default()
}

pub fn parse_rows(input: &str) -> Result<Vec<CuratedRow>> {
  let table = Table::parse(input)?;
  table.require(&["Child", "Parent"])?;

  Ok(
    table
      .records()
      .filter_map(|record| {
        Some(CuratedRow {
          line:            record.line(),
          child:           record.value("Child")?.to_owned(),
          parent:          owned(record.value("Parent")),
          derivation_type: owned(record.value("Derivation Type")),
          certainty:       owned(record.value("Certainty Type")),
          source:          owned(record.value("Source")),
          notes:           owned(record.value("Notes")),
        })
      })
      .collect(),
  )
}

fn owned(value: Option<&str>) -> Option<String> { value.map(str::to_owned) }
