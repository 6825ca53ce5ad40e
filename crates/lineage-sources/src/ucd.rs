//! Unicode Character Database files: `Scripts.txt` and `UnicodeData.txt`.
//!
//! `UnicodeData.txt` pipeline:
//!   raw line
//!     └─ split on `;`           → 15 fields
//!          └─ <Tag, First> ?    → remember as range template
//!               └─ <Tag, Last>  → expand every value in the range
//!                    └─ parse_decomposition() → kind + components

use std::sync::LazyLock;

use lineage_core::code_point::DecompositionKind;
use regex::Regex;

use crate::{
  error::{Error, Result},
  parse_scalar,
};

static SCRIPT_RANGE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^([0-9A-F]+)(?:\.\.([0-9A-F]+))?\s*; ([_a-zA-Z]+) #").unwrap()
});

static DECOMPOSITION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?:<([a-zA-Z]+)> )?([\s0-9A-F]+)$").unwrap());

// ─── Scripts.txt ─────────────────────────────────────────────────────────────

/// An inclusive scalar range assigned to one script, by Unicode script name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRange {
  pub start:       u32,
  pub end:         u32,
  pub script_name: String,
}

pub fn parse_script_ranges(input: &str) -> Result<Vec<ScriptRange>> {
  let mut ranges = Vec::new();
  for (index, raw) in input.lines().enumerate() {
    if is_skippable(raw) {
      continue;
    }
    let line = index + 1;
    let caps = SCRIPT_RANGE
      .captures(raw)
      .ok_or_else(|| Error::malformed(line, "script range", raw))?;
    let start = hex(line, &caps[1])?;
    let end = caps.get(2).map(|m| hex(line, m.as_str())).transpose()?.unwrap_or(start);
    if end < start {
      return Err(Error::malformed(line, "script range", raw));
    }
    ranges.push(ScriptRange { start, end, script_name: caps[3].to_owned() });
  }
  Ok(ranges)
}

// ─── UnicodeData.txt ─────────────────────────────────────────────────────────

/// A decomposition field split into its kind and ordered components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
  pub kind:       DecompositionKind,
  pub components: Vec<u32>,
}

/// One code point's properties. Range rows are expanded, one record per
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeRecord {
  pub id:               u32,
  pub name:             Option<String>,
  pub general_category: Option<String>,
  pub bidi_class:       Option<String>,
  pub uppercase:        Option<u32>,
  pub lowercase:        Option<u32>,
  pub decomposition:    Option<Decomposition>,
}

const FIELD_COUNT: usize = 14;

/// Parser state between a `<Tag, First>` row and its `<Tag, Last>` row.
enum Pending {
  None,
  Range(UnicodeRecord, String),
  Skip,
}

pub fn parse_unicode_data(input: &str) -> Result<Vec<UnicodeRecord>> {
  let mut records = Vec::new();
  let mut pending = Pending::None;

  for (index, raw) in input.lines().enumerate() {
    if is_skippable(raw) {
      continue;
    }
    let line = index + 1;
    let fields: Vec<&str> = raw.split(';').collect();
    if fields.len() < FIELD_COUNT {
      return Err(Error::malformed(line, "UnicodeData record", raw));
    }
    let id = hex(line, fields[0])?;

    match std::mem::replace(&mut pending, Pending::None) {
      Pending::Skip if is_range_end(fields[1]) => continue,
      Pending::Range(first, tag) if is_range_end(fields[1]) && first.id <= id => {
        for id in first.id..=id {
          records.push(UnicodeRecord {
            id,
            name: Some(format!("{tag}-{id:04X}")),
            ..first.clone()
          });
        }
        continue;
      }
      Pending::Skip | Pending::Range(..) => {
        return Err(Error::malformed(line, "range end", raw));
      }
      Pending::None => {}
    }

    let mut record = UnicodeRecord {
      id,
      name: None,
      general_category: non_empty(fields[2]),
      bidi_class: non_empty(fields[4]),
      uppercase: optional_hex(line, fields[12])?,
      lowercase: optional_hex(line, fields[13])?,
      decomposition: parse_decomposition(fields[5])
        .map_err(|_| Error::malformed(line, "decomposition", fields[5]))?,
    };

    match special_name(fields[1]) {
      Some(_) if is_range_end(fields[1]) => {
        return Err(Error::malformed(line, "range end without start", raw));
      }
      Some((tag, true)) => {
        let tag = tag.to_uppercase();
        pending = if tag.contains("SURROGATE") || tag.contains("PRIVATE") {
          Pending::Skip
        } else {
          Pending::Range(record, tag)
        };
      }
      Some((_, false)) => records.push(record),
      None => {
        record.name = non_empty(fields[1]);
        records.push(record);
      }
    }
  }

  if !matches!(pending, Pending::None) {
    return Err(Error::malformed(0, "UnicodeData range", "unterminated <..., First> row"));
  }
  Ok(records)
}

/// `<control>` → `("control", false)`, `<CJK Ideograph, First>` →
/// `("CJK Ideograph", true)`, plain names → `None`.
fn special_name(field: &str) -> Option<(&str, bool)> {
  let inner = field.strip_prefix('<')?.strip_suffix('>')?;
  match inner.split_once(',') {
    Some((tag, _)) => Some((tag.trim(), true)),
    None => Some((inner, false)),
  }
}

fn is_range_end(field: &str) -> bool { field.ends_with(", Last>") }

/// Parse a decomposition field. Empty fields have no decomposition.
pub fn parse_decomposition(field: &str) -> Result<Option<Decomposition>> {
  let field = field.trim();
  if field.is_empty() {
    return Ok(None);
  }
  let caps = DECOMPOSITION
    .captures(field)
    .ok_or_else(|| Error::malformed(0, "decomposition", field))?;
  let components = caps[2]
    .split_whitespace()
    .map(|c| parse_scalar(c).ok_or_else(|| Error::malformed(0, "decomposition", field)))
    .collect::<Result<Vec<_>>>()?;
  if components.is_empty() {
    return Err(Error::malformed(0, "decomposition", field));
  }
  let kind = match caps.get(1) {
    Some(tag) => DecompositionKind::parse(tag.as_str())?,
    None if components.len() == 1 => DecompositionKind::Singleton,
    None => DecompositionKind::Canonical,
  };
  Ok(Some(Decomposition { kind, components }))
}

fn is_skippable(raw: &str) -> bool { raw.trim().is_empty() || raw.starts_with('#') }

fn non_empty(field: &str) -> Option<String> {
  let field = field.trim();
  (!field.is_empty()).then(|| field.to_owned())
}

/// Hex code point as written. Surrogates are accepted here; they only occur
/// inside skipped ranges.
fn hex(line: usize, value: &str) -> Result<u32> {
  let trimmed = value.trim();
  let valid = !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_hexdigit());
  valid
    .then(|| u32::from_str_radix(trimmed, 16).ok())
    .flatten()
    .filter(|v| *v <= 0x10FFFF)
    .ok_or_else(|| Error::InvalidCodePoint { line, value: value.to_owned() })
}

fn optional_hex(line: usize, value: &str) -> Result<Option<u32>> {
  let value = value.trim();
  if value.is_empty() { Ok(None) } else { hex(line, value).map(Some) }
}
