//! Cognate-letter tables scraped from wikitext templates.
//!
//! Each table describes one letter class. Entries look like `|devacp=0915`
//! (a code point, possibly written as an HTML entity `&#x0915;`) or
//! `|guptimg=Gupta ka.svg` (an image of an unencoded glyph). An entry with no
//! value records that the script lacks the letter.

use std::sync::LazyLock;

use regex::Regex;

static ENTRY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\|\s*([a-z0-9]+)(cp|img)\s*=([^|]*)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
  /// The hex digits of a code point, entity syntax stripped. Not validated.
  CodePoint(String),
  Image(String),
  Empty,
}

/// One `|<tag><cp|img>=<value>` entry, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
  pub tag:   String,
  pub value: EntryValue,
}

impl TableEntry {
  /// The entry's character, if it is a well-formed code point entry.
  pub fn scalar(&self) -> Option<char> {
    match &self.value {
      EntryValue::CodePoint(hex) => crate::parse_scalar(hex).and_then(char::from_u32),
      EntryValue::Image(_) | EntryValue::Empty => None,
    }
  }

  /// Whether the entry shows the letter at all, as a code point or an image.
  pub fn is_attested(&self) -> bool { !matches!(self.value, EntryValue::Empty) }
}

/// Extract every entry of a table, in table order.
pub fn parse_table(input: &str) -> Vec<TableEntry> {
  ENTRY
    .captures_iter(input)
    .map(|caps| {
      let value = clean_value(&caps[3]);
      let value = match &caps[2] {
        _ if value.is_empty() => EntryValue::Empty,
        "cp" => EntryValue::CodePoint(strip_entity(value).to_owned()),
        _ => EntryValue::Image(value.to_owned()),
      };
      TableEntry { tag: caps[1].to_owned(), value }
    })
    .collect()
}

/// A value runs to the end of its line; a closing `}}` is not part of it.
fn clean_value(raw: &str) -> &str {
  let line = raw.lines().next().unwrap_or_default().trim();
  line.split("}}").next().unwrap_or_default().trim()
}

fn strip_entity(value: &str) -> &str {
  let value = value.strip_prefix("&#x").or_else(|| value.strip_prefix("&#X")).unwrap_or(value);
  let value = value.strip_prefix("U+").unwrap_or(value);
  value.strip_suffix(';').unwrap_or(value).trim()
}
