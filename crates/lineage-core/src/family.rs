//! Declarative script-family configuration: letter orders, parent maps,
//! terminal scripts, tag aliases and fill-in (provisional ancestor) nodes.
//!
//! The built-in document lives in `data/families.toml`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;

use crate::{Error, Result, code_point::is_private_use, script::private_iso_id};

const BUILTIN: &str = include_str!("../data/families.toml");

/// Every configured family plus the global independent-script list.
#[derive(Debug, Clone, Deserialize)]
pub struct Families {
  /// Scripts whose characters are all treated as independently invented.
  #[serde(default)]
  pub independent_scripts: BTreeSet<String>,
  #[serde(rename = "family", default)]
  pub families:            Vec<LetterFamily>,
}

/// A group of scripts compared letter class by letter class in one set of
/// cognate tables.
#[derive(Debug, Clone, Deserialize)]
pub struct LetterFamily {
  pub name:              String,
  /// Directory under `wikipedia-sourced/` holding one table per letter.
  pub table_dir:         String,
  /// Letter classes in canonical order. A letter's index is its ordinal.
  pub letters:           Vec<String>,
  #[serde(default)]
  pub terminal:          BTreeSet<String>,
  /// Child script code to parent script code.
  #[serde(default)]
  pub parents:           BTreeMap<String, String>,
  /// Table tag to script code, consulted before the default normalization.
  #[serde(default)]
  pub aliases:           BTreeMap<String, String>,
  #[serde(default)]
  pub fill_in:           BTreeMap<String, FillIn>,
  /// Script code to letter to hex scalar value, for table cells that only
  /// carry an image.
  #[serde(default)]
  pub image_equivalents: BTreeMap<String, BTreeMap<String, String>>,
}

/// A script node that receives synthesized private-use letters.
#[derive(Debug, Clone, Deserialize)]
pub struct FillIn {
  /// Used in synthesized character names and generated alphabet labels.
  pub label:         String,
  pub block_start:   u32,
  /// Letters synthesized without descendant agreement.
  #[serde(default)]
  pub unconditional: Vec<String>,
}

impl Families {
  /// The embedded default configuration.
  pub fn builtin() -> Result<Self> { Self::from_toml(BUILTIN) }

  /// Parse and validate a families document.
  pub fn from_toml(source: &str) -> Result<Self> {
    let families: Self = toml::from_str(source)?;
    families.validate()?;
    Ok(families)
  }

  pub fn is_independent(&self, script_code: &str) -> bool {
    self.independent_scripts.contains(script_code)
  }

  pub fn validate(&self) -> Result<()> {
    let mut names = HashSet::new();
    let mut blocks: Vec<(u32, u32, String)> = Vec::new();

    for family in &self.families {
      if !names.insert(family.name.as_str()) {
        return Err(invalid(format!("duplicate family `{}`", family.name)));
      }
      family.validate()?;
      for (code, fill) in &family.fill_in {
        let end = family.block_end(fill).ok_or_else(|| overflowing_block(code))?;
        blocks.push((fill.block_start, end, code.clone()));
      }
    }

    blocks.sort();
    for pair in blocks.windows(2) {
      let ((_, end, a), (start, _, b)) = (&pair[0], &pair[1]);
      if start <= end {
        return Err(invalid(format!("fill-in blocks of `{a}` and `{b}` overlap")));
      }
    }
    Ok(())
  }
}

impl LetterFamily {
  fn validate(&self) -> Result<()> {
    let name = &self.name;

    let mut seen = HashSet::new();
    for letter in &self.letters {
      if !seen.insert(letter.as_str()) {
        return Err(invalid(format!("family `{name}` lists letter `{letter}` twice")));
      }
    }

    for code in self.parents.keys() {
      let mut cursor = code.as_str();
      for _ in 0..=self.parents.len() {
        match self.parents.get(cursor) {
          Some(parent) => cursor = parent,
          None => break,
        }
        if cursor == code {
          return Err(invalid(format!("family `{name}` has a parent cycle through `{code}`")));
        }
      }
    }

    for (code, fill) in &self.fill_in {
      if private_iso_id(code).is_none() && !self.contains_script(code) {
        return Err(invalid(format!(
          "fill-in node `{code}` of `{name}` is neither private nor in the family tree"
        )));
      }
      let last = self.block_end(fill).ok_or_else(|| overflowing_block(code))?;
      if !is_private_use(fill.block_start) || !is_private_use(last) {
        return Err(invalid(format!(
          "fill-in block of `{code}` ({:X}..={last:X}) leaves the private-use area",
          fill.block_start
        )));
      }
      if let Some(letter) = fill.unconditional.iter().find(|l| self.ordinal(l).is_none()) {
        return Err(invalid(format!("unconditional letter `{letter}` of `{code}` is unknown")));
      }
    }

    for (code, table) in &self.image_equivalents {
      for (letter, hex) in table {
        if self.ordinal(letter).is_none() {
          return Err(invalid(format!("image equivalent for unknown letter `{letter}`")));
        }
        if parse_scalar(hex).is_none() {
          return Err(invalid(format!("image equivalent `{hex}` of `{code}` is not a scalar")));
        }
      }
    }
    Ok(())
  }

  /// Zero-based position of `letter` in the canonical order.
  pub fn ordinal(&self, letter: &str) -> Option<u32> {
    self.letters.iter().position(|l| l == letter).map(|i| i as u32)
  }

  /// Normalize a cognate-table tag (`deva`, `tibt2`, `gupt`) into a script
  /// code.
  pub fn script_code(&self, tag: &str) -> String {
    if let Some(code) = self.aliases.get(tag) {
      return code.clone();
    }
    let stem = tag.trim_end_matches(|c: char| c.is_ascii_digit());
    let mut chars = stem.chars();
    match chars.next() {
      Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
      None => String::new(),
    }
  }

  pub fn is_terminal(&self, script_code: &str) -> bool { self.terminal.contains(script_code) }

  pub fn parent_of(&self, script_code: &str) -> Option<&str> {
    self.parents.get(script_code).map(String::as_str)
  }

  /// Scripts whose direct parent is `script_code`, in code order.
  pub fn children_of<'a>(&'a self, script_code: &'a str) -> impl Iterator<Item = &'a str> {
    self
      .parents
      .iter()
      .filter(move |(_, parent)| parent.as_str() == script_code)
      .map(|(child, _)| child.as_str())
  }

  /// Number of ancestors above `script_code` in the tree.
  pub fn depth(&self, script_code: &str) -> usize {
    let mut depth = 0;
    let mut cursor = script_code;
    while let Some(parent) = self.parent_of(cursor) {
      depth += 1;
      cursor = parent;
      if depth > self.parents.len() {
        break;
      }
    }
    depth
  }

  /// Fill-in nodes, deepest first, so a node's synthesized letters are in
  /// place before its own ancestors are considered.
  pub fn fill_in_order(&self) -> Vec<(&str, &FillIn)> {
    let mut nodes: Vec<_> = self.fill_in.iter().map(|(c, f)| (c.as_str(), f)).collect();
    nodes.sort_by(|(a, _), (b, _)| self.depth(b).cmp(&self.depth(a)).then(a.cmp(b)));
    nodes
  }

  /// Scalar value of the synthesized letter for a fill-in node.
  pub fn synthesized_id(&self, script_code: &str, letter: &str) -> Option<u32> {
    let fill = self.fill_in.get(script_code)?;
    fill.block_start.checked_add(self.ordinal(letter)?)
  }

  /// Last scalar value of a fill-in block, if it fits in a `u32`.
  fn block_end(&self, fill: &FillIn) -> Option<u32> {
    let span = u32::try_from(self.letters.len().saturating_sub(1)).ok()?;
    fill.block_start.checked_add(span)
  }

  /// Real character standing in for an image-only table cell.
  pub fn image_equivalent(&self, script_code: &str, letter: &str) -> Option<char> {
    self.image_equivalents.get(script_code)?.get(letter).and_then(|hex| parse_scalar(hex))
  }

  fn contains_script(&self, code: &str) -> bool {
    self.parents.contains_key(code) || self.parents.values().any(|p| p == code)
  }
}

fn parse_scalar(hex: &str) -> Option<char> {
  u32::from_str_radix(hex.trim(), 16).ok().and_then(char::from_u32)
}

fn invalid(message: String) -> Error { Error::InvalidFamily(message) }

fn overflowing_block(code: &str) -> Error {
  invalid(format!("fill-in block of `{code}` runs past the last scalar value"))
}
