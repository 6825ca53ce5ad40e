//! Code points and their decomposition data.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, IntoStaticStr};

use crate::{Error, Result, script::UNKNOWN_SCRIPT};

/// The no-parent sentinel: a Unicode non-character standing for "known to be
/// independently invented".
pub const NO_PARENT: char = '\u{FFFF}';

pub const DEFAULT_GENERAL_CATEGORY: &str = "Cn";
pub const DEFAULT_BIDI_CLASS: &str = "L";

// ─── Decomposition ───────────────────────────────────────────────────────────

/// How a code point decomposes. `Canonical` and `Singleton` come from bare
/// decomposition sequences; every other variant is a `<tag>` compatibility
/// subtype from `UnicodeData.txt`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  AsRefStr,
  EnumString,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum DecompositionKind {
  Canonical,
  Singleton,
  Font,
  NoBreak,
  Initial,
  Medial,
  Final,
  Isolated,
  Circle,
  Super,
  Sub,
  Vertical,
  Wide,
  Narrow,
  Small,
  Square,
  Fraction,
  Compat,
}

impl DecompositionKind {
  /// Parse a `<tag>` value or a stored column value.
  pub fn parse(tag: &str) -> Result<Self> {
    Self::from_str(tag).map_err(|_| Error::UnknownDecompositionTag(tag.to_owned()))
  }

  /// Canonical equivalents, including single-character ones.
  pub fn is_canonical(self) -> bool { matches!(self, Self::Canonical | Self::Singleton) }

  /// Compatibility forms that are the same glyph at a different size or
  /// spacing.
  pub fn is_stylistic_variant(self) -> bool {
    matches!(self, Self::NoBreak | Self::Small | Self::Sub | Self::Super)
  }
}

/// One ordered component of a code point's decomposition.
///
/// Ordering is `(code_point, component, order)`, the table's composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decomposition {
  pub code_point: u32,
  pub component:  u32,
  /// 1-based position of `component` within the sequence.
  pub order:      u32,
}

// ─── CodePoint ───────────────────────────────────────────────────────────────

/// One catalogued scalar value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePoint {
  pub id:                 u32,
  pub name:               Option<String>,
  pub script_code:        String,
  pub general_category:   String,
  pub bidi_class:         String,
  pub uppercase:          Option<u32>,
  pub lowercase:          Option<u32>,
  pub decomposition_kind: Option<DecompositionKind>,
  /// Position in the owning script's standard alphabet, 1-based.
  pub std_order:          Option<u32>,
}

impl CodePoint {
  pub fn new(id: u32, script_code: impl Into<String>) -> Self {
    Self {
      id,
      name: None,
      script_code: script_code.into(),
      general_category: DEFAULT_GENERAL_CATEGORY.to_owned(),
      bidi_class: DEFAULT_BIDI_CLASS.to_owned(),
      uppercase: None,
      lowercase: None,
      decomposition_kind: None,
      std_order: None,
    }
  }

  /// The [`NO_PARENT`] sentinel row.
  pub fn no_parent() -> Self {
    Self {
      name: Some("NO PARENT CHARACTER".to_owned()),
      bidi_class: "Bn".to_owned(),
      ..Self::new(NO_PARENT as u32, UNKNOWN_SCRIPT)
    }
  }

  pub fn as_char(&self) -> Option<char> { char::from_u32(self.id) }

  /// Display text: empty for unassigned and surrogate categories, otherwise
  /// the character itself.
  pub fn text(&self) -> String {
    match self.general_category.as_str() {
      "Cn" | "Cs" => String::new(),
      _ => self.as_char().map(String::from).unwrap_or_default(),
    }
  }

  /// Separators (`Z*`) and control/format/unassigned (`C*`) categories,
  /// which never take part in decomposition-based derivation.
  pub fn is_layout_category(&self) -> bool {
    self.general_category.starts_with('Z') || self.general_category.starts_with('C')
  }
}

/// Whether `id` falls inside one of the Unicode private-use areas.
pub fn is_private_use(id: u32) -> bool {
  matches!(id, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}
