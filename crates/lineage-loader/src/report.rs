//! Plain-text tables for the terminal.
//!
//! Every cell is wrapped in a first-strong isolate so right-to-left text
//! cannot reorder the column separators around it. Widths are counted in
//! scalar values, not graphemes, so combining marks still shift columns.

use std::fmt::Write as _;

use lineage_store_sqlite::QueryResult;

use crate::audit::CoverageGap;

const ISOLATE: char = '\u{2068}';
const POP_ISOLATE: char = '\u{2069}';

const COVERAGE_PAD: usize = 22;
const COVERAGE_HEADER: &str = "|  Missing derivations from standard alphabet";
/// From this many missing characters on, a gap is reported as a count.
const COVERAGE_LIST_LIMIT: usize = 12;

// ─── Query results ───────────────────────────────────────────────────────────

/// Render a query result as a boxed table, headers title-cased.
pub fn format_table(result: &QueryResult) -> String {
  let header: Vec<String> = result.columns.iter().map(String::as_str).map(header_label).collect();
  let rows: Vec<Vec<String>> =
    result.rows.iter().map(|row| row.iter().map(ToString::to_string).collect()).collect();

  let pads: Vec<usize> = (0..header.len())
    .map(|i| {
      rows
        .iter()
        .chain(std::iter::once(&header))
        .filter_map(|row| row.get(i))
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
    })
    .collect();

  let mut out = String::new();
  separator_row(&mut out, '+', &pads);
  data_row(&mut out, &header, &pads);
  separator_row(&mut out, '|', &pads);
  for row in &rows {
    data_row(&mut out, row, &pads);
  }
  separator_row(&mut out, '+', &pads);
  out
}

fn separator_row(out: &mut String, bookend: char, pads: &[usize]) {
  let dashes: Vec<String> = pads.iter().map(|&p| "-".repeat(p)).collect();
  let _ = writeln!(out, "{bookend}--{}--{bookend}", dashes.join("--+--"));
}

fn data_row(out: &mut String, cells: &[String], pads: &[usize]) {
  let cells: Vec<String> = cells.iter().zip(pads).map(|(cell, &pad)| ljust(cell, pad)).collect();
  let glue = format!("{POP_ISOLATE}  |  {ISOLATE}");
  let _ = writeln!(out, "|  {ISOLATE}{}{POP_ISOLATE}  |", cells.join(&glue));
}

fn ljust(cell: &str, width: usize) -> String {
  let len = cell.chars().count();
  let mut padded = cell.to_owned();
  padded.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
  padded
}

/// `child_text` becomes `Child Text`: underscores to spaces, then the first
/// letter of every alphabetic run upper-cased and the rest lower-cased.
fn header_label(column: &str) -> String {
  let mut label = String::with_capacity(column.len());
  let mut in_word = false;
  for ch in column.chars() {
    let ch = if ch == '_' { ' ' } else { ch };
    if ch.is_alphabetic() {
      if in_word {
        label.extend(ch.to_lowercase());
      } else {
        label.extend(ch.to_uppercase());
      }
      in_word = true;
    } else {
      label.push(ch);
      in_word = false;
    }
  }
  label
}

// ─── Coverage ────────────────────────────────────────────────────────────────

/// Render coverage gaps as a two-column audit table.
pub fn format_coverage(gaps: &[CoverageGap]) -> String {
  let header = format!("{:<COVERAGE_PAD$}{COVERAGE_HEADER}", "Script");
  let rule = format!(
    "{}+{}",
    "-".repeat(COVERAGE_PAD),
    "-".repeat(header.chars().count() - COVERAGE_PAD - 1)
  );

  let mut out = String::new();
  let _ = writeln!(out, "{rule}");
  let _ = writeln!(out, "{header}");
  let _ = writeln!(out, "{rule}");
  for gap in gaps {
    let missing = if gap.missing.len() >= COVERAGE_LIST_LIMIT {
      format!("{} characters", gap.missing.len())
    } else {
      gap.missing.iter().map(char::to_string).collect::<Vec<_>>().join(", ")
    };
    let _ = writeln!(out, "{:<COVERAGE_PAD$}|  {missing}", gap.script_label);
  }
  out
}
