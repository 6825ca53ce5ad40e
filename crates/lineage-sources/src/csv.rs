//! Minimal RFC 4180 reader and writer for the resource tables.
//!
//! Fields may be double-quoted; quoted fields may contain commas, newlines
//! and doubled quotes. The first record is the header row. Blank lines are
//! skipped.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A parsed table with named columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
  columns: HashMap<String, usize>,
  headers: Vec<String>,
  rows:    Vec<(usize, Vec<String>)>,
}

/// One data row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
  table:  &'a Table,
  line:   usize,
  fields: &'a [String],
}

impl Table {
  pub fn parse(input: &str) -> Result<Self> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut records = split_records(input)?.into_iter();

    let Some((_, headers)) = records.next() else {
      return Ok(Self::default());
    };
    let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_owned()).collect();
    let columns = headers.iter().enumerate().map(|(i, h)| (h.clone(), i)).collect();

    Ok(Self { columns, headers, rows: records.collect() })
  }

  pub fn headers(&self) -> &[String] { &self.headers }

  pub fn has_column(&self, column: &str) -> bool { self.columns.contains_key(column) }

  /// Fail unless every column in `columns` is present.
  pub fn require(&self, columns: &[&str]) -> Result<()> {
    match columns.iter().find(|c| !self.has_column(c)) {
      Some(missing) => Err(Error::MissingColumn((*missing).to_owned())),
      None => Ok(()),
    }
  }

  pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
    self.rows.iter().map(move |(line, fields)| Record { table: self, line: *line, fields })
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

impl<'a> Record<'a> {
  /// Raw cell content; `None` when the column is absent or the row is short.
  pub fn get(&self, column: &str) -> Option<&'a str> {
    let index = *self.table.columns.get(column)?;
    self.fields.get(index).map(String::as_str)
  }

  /// Trimmed cell content, with blank cells mapped to `None`.
  pub fn value(&self, column: &str) -> Option<&'a str> {
    self.get(column).map(str::trim).filter(|s| !s.is_empty())
  }

  /// 1-based line number the record starts on.
  pub fn line(&self) -> usize { self.line }
}

// ─── Reading ─────────────────────────────────────────────────────────────────

fn split_records(input: &str) -> Result<Vec<(usize, Vec<String>)>> {
  let mut records = Vec::new();
  let mut fields: Vec<String> = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut line = 1usize;
  let mut start_line = 1usize;
  let mut chars = input.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes => {
        if chars.peek() == Some(&'"') {
          chars.next();
          field.push('"');
        } else {
          in_quotes = false;
        }
      }
      '"' if field.trim().is_empty() => {
        field.clear();
        in_quotes = true;
      }
      '\n' if in_quotes => {
        line += 1;
        field.push('\n');
      }
      ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
      '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
      '\n' => {
        fields.push(std::mem::take(&mut field));
        push_record(&mut records, start_line, std::mem::take(&mut fields));
        line += 1;
        start_line = line;
      }
      _ => field.push(c),
    }
  }

  if in_quotes {
    return Err(Error::malformed(start_line, "CSV record", "unterminated quoted field"));
  }
  if !field.is_empty() || !fields.is_empty() {
    fields.push(field);
    push_record(&mut records, start_line, fields);
  }
  Ok(records)
}

fn push_record(records: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
  let blank = fields.iter().all(|f| f.trim().is_empty());
  if !blank {
    records.push((line, fields));
  }
}

// ─── Writing ─────────────────────────────────────────────────────────────────

/// Render a table with a header row. Lines end in `\n`; cells are quoted only
/// when they need to be.
pub fn write<I, R>(headers: &[&str], rows: I) -> String
where
  I: IntoIterator<Item = R>,
  R: IntoIterator,
  R::Item: AsRef<str>,
{
  let mut out = String::new();
  write_row(&mut out, headers.iter());
  for row in rows {
    write_row(&mut out, row.into_iter());
  }
  out
}

fn write_row<T: AsRef<str>>(out: &mut String, cells: impl Iterator<Item = T>) {
  for (i, cell) in cells.enumerate() {
    if i > 0 {
      out.push(',');
    }
    let cell = cell.as_ref();
    if cell.contains([',', '"', '\n', '\r']) {
      out.push('"');
      out.push_str(&cell.replace('"', "\"\""));
      out.push('"');
    } else {
      out.push_str(cell);
    }
  }
  out.push('\n');
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_quoted_fields_and_line_numbers() {
    let input = "\u{feff}Child,Parent,Notes\r\na,b,plain\n\nc,d,\"with, comma\nand \"\"quotes\"\"\"\ne,,\n";
    let table = Table::parse(input).unwrap();
    assert_eq!(table.headers(), ["Child", "Parent", "Notes"]);
    let records: Vec<Record<'_>> = table.records().collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].get("Notes"), Some("plain"));
    assert_eq!(records[1].line(), 4);
    assert_eq!(records[1].get("Notes"), Some("with, comma\nand \"quotes\""));
    assert_eq!(records[2].line(), 6);
    assert_eq!(records[2].value("Parent"), None);
    assert_eq!(records[2].get("Missing"), None);
  }

  #[test]
  fn short_rows_and_missing_trailing_newline() {
    let table = Table::parse("A,B,C\n1,2").unwrap();
    let record = table.records().next().unwrap();
    assert_eq!(record.get("B"), Some("2"));
    assert_eq!(record.get("C"), None);
  }

  #[test]
  fn unterminated_quote_is_an_error() {
    assert!(matches!(
      Table::parse("A\n\"oops\n"),
      Err(Error::Malformed { line: 2, .. })
    ));
  }

  #[test]
  fn require_names_the_missing_column() {
    let table = Table::parse("Script,Alphabet\n").unwrap();
    assert!(table.require(&["Script"]).is_ok());
    assert!(matches!(
      table.require(&["Script", "Order"]),
      Err(Error::MissingColumn(c)) if c == "Order"
    ));
  }

  #[test]
  fn writer_quotes_only_when_needed() {
    let out = write(&["Script", "Alphabet"], [["Latin", "abc"], ["Odd", "a,\"b\""]]);
    assert_eq!(out, "Script,Alphabet\nLatin,abc\nOdd,\"a,\"\"b\"\"\"\n");
    let table = Table::parse(&out).unwrap();
    assert_eq!(table.records().nth(1).unwrap().get("Alphabet"), Some("a,\"b\""));
  }
}
