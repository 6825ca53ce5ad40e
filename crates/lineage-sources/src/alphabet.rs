//! Standard-alphabet files: one row per script, the alphabet written out as
//! a string whose character positions give the teaching order.

use crate::{csv, error::Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphabetRow {
  /// Script label as written: a Unicode script name or an ISO code.
  pub script:   String,
  pub alphabet: String,
}

impl AlphabetRow {
  pub fn chars(&self) -> impl Iterator<Item = char> + '_ { self.alphabet.chars() }
}

pub fn parse(input: &str) -> Result<Vec<AlphabetRow>> {
  let table = csv::Table::parse(input)?;
  table.require(&["Script", "Alphabet"])?;

  Ok(
    table
      .records()
      .filter_map(|record| {
        Some(AlphabetRow {
          script:   record.value("Script")?.to_owned(),
          alphabet: record.get("Alphabet").unwrap_or_default().trim().to_owned(),
        })
      })
      .collect(),
  )
}

pub fn render(rows: &[AlphabetRow]) -> String {
  csv::write(
    &["Script", "Alphabet"],
    rows.iter().map(|r| [r.script.as_str(), r.alphabet.as_str()]),
  )
}
