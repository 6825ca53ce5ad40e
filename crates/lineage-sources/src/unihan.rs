//! `Unihan_Variants.txt`: simplified-to-traditional variant pairs.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static TRADITIONAL_VARIANT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^U\+([0-9A-F]+)\tkTraditionalVariant\t(.+)$").unwrap());

/// Every `(simplified, traditional)` pair listed under `kTraditionalVariant`,
/// in file order. A row may list several traditional forms. Self-mappings are
/// kept; callers decide whether they matter.
pub fn parse_traditional_variants(input: &str) -> Result<Vec<(u32, u32)>> {
  let mut pairs = Vec::new();
  for (index, raw) in input.lines().enumerate() {
    let Some(caps) = TRADITIONAL_VARIANT.captures(raw.trim_end()) else {
      continue;
    };
    let line = index + 1;
    let child = scalar(line, &caps[1])?;
    for value in caps[2].split_whitespace() {
      let hex = value
        .strip_prefix("U+")
        .ok_or_else(|| Error::malformed(line, "kTraditionalVariant value", value))?;
      pairs.push((child, scalar(line, hex)?));
    }
  }
  Ok(pairs)
}

fn scalar(line: usize, hex: &str) -> Result<u32> {
  crate::parse_scalar(hex).ok_or_else(|| Error::InvalidCodePoint { line, value: hex.to_owned() })
}
