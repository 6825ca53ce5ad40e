//! Conversions between domain types and their SQLite column values.
//!
//! Scalar values are stored as plain integers, lookups by their stable id,
//! decomposition kinds by their UCD tag spelling.

use lineage_core::{
  code_point::{CodePoint, DecompositionKind},
  derivation::{CertaintyType, DerivationEdge, DerivationType},
};

use crate::{Error, Result};

// ─── Ids ─────────────────────────────────────────────────────────────────────

pub fn decode_id(raw: i64) -> Result<u32> {
  u32::try_from(raw)
    .ok()
    .filter(|v| char::from_u32(*v).is_some())
    .ok_or(Error::InvalidCodePoint(raw))
}

fn decode_optional_id(raw: Option<i64>) -> Result<Option<u32>> { raw.map(decode_id).transpose() }

// ─── DecompositionKind ───────────────────────────────────────────────────────

pub fn encode_kind(kind: Option<DecompositionKind>) -> Option<&'static str> {
  kind.map(<&'static str>::from)
}

fn decode_kind(raw: Option<&str>) -> Result<Option<DecompositionKind>> {
  Ok(raw.map(DecompositionKind::parse).transpose()?)
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `code_point` row as read from SQLite.
pub struct RawCodePoint {
  pub id:                 i64,
  pub name:               Option<String>,
  pub script_code:        String,
  pub general_category:   String,
  pub bidi_class:         String,
  pub uppercase:          Option<i64>,
  pub lowercase:          Option<i64>,
  pub decomposition_kind: Option<String>,
  pub std_order:          Option<i64>,
}

impl RawCodePoint {
  pub const COLUMNS: &'static str = "id, name, script_code, general_category_code, \
                                     bidi_class_code, simple_uppercase_mapping_id, \
                                     simple_lowercase_mapping_id, decomposition_type, \
                                     std_order_num";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      name:               row.get(1)?,
      script_code:        row.get(2)?,
      general_category:   row.get(3)?,
      bidi_class:         row.get(4)?,
      uppercase:          row.get(5)?,
      lowercase:          row.get(6)?,
      decomposition_kind: row.get(7)?,
      std_order:          row.get(8)?,
    })
  }

  pub fn into_code_point(self) -> Result<CodePoint> {
    Ok(CodePoint {
      id:                 decode_id(self.id)?,
      name:               self.name,
      script_code:        self.script_code,
      general_category:   self.general_category,
      bidi_class:         self.bidi_class,
      uppercase:          decode_optional_id(self.uppercase)?,
      lowercase:          decode_optional_id(self.lowercase)?,
      decomposition_kind: decode_kind(self.decomposition_kind.as_deref())?,
      std_order:          self.std_order.and_then(|o| u32::try_from(o).ok()),
    })
  }
}

/// A `code_point_derivation` row as read from SQLite.
pub struct RawEdge {
  pub child:           i64,
  pub parent:          i64,
  pub derivation_type: i64,
  pub certainty:       i64,
  pub source:          Option<String>,
  pub notes:           Option<String>,
}

impl RawEdge {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      child:           row.get(0)?,
      parent:          row.get(1)?,
      derivation_type: row.get(2)?,
      certainty:       row.get(3)?,
      source:          row.get(4)?,
      notes:           row.get(5)?,
    })
  }

  pub fn into_edge(self) -> Result<DerivationEdge> {
    Ok(DerivationEdge {
      child:           decode_id(self.child)?,
      parent:          decode_id(self.parent)?,
      derivation_type: DerivationType::from_id(self.derivation_type)?,
      certainty:       CertaintyType::from_id(self.certainty)?,
      source:          self.source,
      notes:           self.notes,
    })
  }
}
