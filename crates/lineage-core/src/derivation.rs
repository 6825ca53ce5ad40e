//! Derivation edges and their two closed lookups.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator as _};

use crate::{Error, Result};

// ─── DerivationType ──────────────────────────────────────────────────────────

/// How a child glyph graphically relates to its parent.
///
/// Discriminants are the stable `derivation_type.id` values.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Display,
  EnumIter,
  Serialize,
  Deserialize,
)]
#[repr(u8)]
pub enum DerivationType {
  #[default]
  #[strum(to_string = "Derivation")]
  Derivation        = 1,
  #[strum(to_string = "Portion copy")]
  PortionCopy       = 2,
  #[strum(to_string = "Simplification")]
  Simplification    = 3,
  #[strum(to_string = "From cursive")]
  FromCursive       = 4,
  #[strum(to_string = "Copy")]
  Copy              = 5,
  #[strum(to_string = "Duplicate")]
  Duplicate         = 6,
  #[strum(to_string = "Portion derivation")]
  PortionDerivation = 7,
  #[strum(to_string = "Rotation")]
  Rotation          = 8,
  #[strum(to_string = "Reflection")]
  Reflection        = 9,
}

impl DerivationType {
  pub fn id(self) -> u8 { self as u8 }

  pub fn from_id(id: i64) -> Result<Self> {
    Self::iter()
      .find(|t| i64::from(t.id()) == id)
      .ok_or_else(|| Error::UnknownDerivationType(id.to_string()))
  }

  /// Parse a resource-file cell: the numeric id or the name, any case.
  pub fn parse_cell(cell: &str) -> Result<Self> {
    let cell = cell.trim();
    if let Ok(id) = cell.parse::<i64>() {
      return Self::from_id(id);
    }
    Self::iter()
      .find(|t| t.to_string().eq_ignore_ascii_case(cell))
      .ok_or_else(|| Error::UnknownDerivationType(cell.to_owned()))
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::Derivation => "Standard/default/non-specific",
      Self::PortionCopy => {
        "Child is a copy of a portion of the parent, allowing for \
         stretch-distortion due to size change"
      }
      Self::Simplification => "Child is a simplification of parent",
      Self::FromCursive => {
        "Child is derived from cursive form of the parent (who is typically \
         non-cursive)"
      }
      Self::Copy => "Child is a copy of the parent",
      Self::Duplicate => "Child is a duplicate of the parent",
      Self::PortionDerivation => "Child is a derivation from a portion of the parent",
      Self::Rotation => "Child is a rotation of the parent",
      Self::Reflection => "Child is a reflection of the parent",
    }
  }
}

// ─── CertaintyType ───────────────────────────────────────────────────────────

/// How confident a derivation claim is, from best to worst supported.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Display,
  EnumIter,
  Serialize,
  Deserialize,
)]
#[repr(u8)]
pub enum CertaintyType {
  #[strum(to_string = "Near Certain")]
  NearCertain = 1,
  #[strum(to_string = "Likely")]
  Likely      = 2,
  #[strum(to_string = "Uncertain")]
  Uncertain   = 3,
  #[strum(to_string = "Automated")]
  Automated   = 4,
  #[strum(to_string = "Assumed")]
  Assumed     = 5,
  #[default]
  #[strum(to_string = "Unspecified")]
  Unspecified = 6,
}

impl CertaintyType {
  pub fn id(self) -> u8 { self as u8 }

  pub fn from_id(id: i64) -> Result<Self> {
    Self::iter()
      .find(|c| i64::from(c.id()) == id)
      .ok_or_else(|| Error::UnknownCertainty(id.to_string()))
  }

  /// Parse a resource-file cell: the numeric id or the name, any case.
  pub fn parse_cell(cell: &str) -> Result<Self> {
    let cell = cell.trim();
    if let Ok(id) = cell.parse::<i64>() {
      return Self::from_id(id);
    }
    Self::iter()
      .find(|c| c.to_string().eq_ignore_ascii_case(cell))
      .ok_or_else(|| Error::UnknownCertainty(cell.to_owned()))
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::NearCertain => "Sources almost all agree, or disagreeing sources are suspect",
      Self::Likely => "Sources mostly agree, or a singular weak source",
      Self::Uncertain => "Sources disagree or are hesitant",
      Self::Automated => {
        "Derived without manual review, usually from Unicode Consortium data"
      }
      Self::Assumed => "Derivation assumed, usually by sound value and/or glyph similarity",
      Self::Unspecified => "Not specified in data files - this is a missing data error",
    }
  }
}

// ─── Edges ───────────────────────────────────────────────────────────────────

/// Primary key of a derivation edge. One child/parent pair may carry several
/// edges, one per derivation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
  pub child:           u32,
  pub parent:          u32,
  pub derivation_type: DerivationType,
}

/// A typed, certainty-annotated claim that `child` derives from `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationEdge {
  pub child:           u32,
  pub parent:          u32,
  pub derivation_type: DerivationType,
  pub certainty:       CertaintyType,
  pub source:          Option<String>,
  pub notes:           Option<String>,
}

impl DerivationEdge {
  /// An algorithmically inferred edge.
  pub fn automated(
    child: u32,
    parent: u32,
    derivation_type: DerivationType,
    source: Option<&str>,
  ) -> Self {
    Self {
      child,
      parent,
      derivation_type,
      certainty: CertaintyType::Automated,
      source: source.map(str::to_owned),
      notes: None,
    }
  }

  pub fn with_notes(mut self, notes: &str) -> Self {
    self.notes = Some(notes.to_owned());
    self
  }

  pub fn key(&self) -> EdgeKey {
    EdgeKey {
      child:           self.child,
      parent:          self.parent,
      derivation_type: self.derivation_type,
    }
  }
}
