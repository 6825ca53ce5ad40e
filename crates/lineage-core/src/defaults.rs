//! Per-field defaulting for curated derivation rows.

/// A cell's trimmed content, or `None` when it is absent or blank.
pub fn non_blank(cell: Option<&str>) -> Option<&str> {
  cell.map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve one field of a curated row.
///
/// Precedence, first match wins:
/// 1. the row's own non-blank value;
/// 2. `overriding` when `override_when` holds (which may be `None`, to force
///    an absent value);
/// 3. the script-wide default;
/// 4. `last_resort`.
pub fn resolve_field<'a>(
  row: Option<&'a str>,
  script_default: Option<&'a str>,
  last_resort: Option<&'a str>,
  override_when: bool,
  overriding: Option<&'a str>,
) -> Option<&'a str> {
  if let Some(value) = non_blank(row) {
    return Some(value);
  }
  if override_when {
    return overriding;
  }
  non_blank(script_default).or(last_resort)
}
