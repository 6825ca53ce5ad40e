//! Builds the code-point catalog from the UCD files, the private-use tables
//! and the standard alphabets.

use lineage_core::{
  catalog::Catalog,
  code_point::{CodePoint, Decomposition},
  script::{ScriptRegistry, UNKNOWN_SCRIPT},
};
use lineage_sources::{
  alphabet::{self, AlphabetRow},
  private_use::{self, PrivateUseRecord},
  ucd::{self, ScriptRange, UnicodeRecord},
};
use tracing::{debug, info, warn};

use crate::{Error, Resources, Result};

/// The finished catalog plus the scripts that have a standard alphabet, in
/// first-listed order.
#[derive(Debug, Clone, Default)]
pub struct BuiltCatalog {
  pub catalog:          Catalog,
  pub alphabet_scripts: Vec<String>,
}

/// Read every catalog source under `resources` and assemble the catalog.
///
/// `synthesized` private-use records are applied after the curated ones and
/// `generated` alphabets after the curated alphabet file.
pub fn build(
  resources: &Resources,
  scripts: &ScriptRegistry,
  synthesized: &[PrivateUseRecord],
  generated: &[AlphabetRow],
  verify: bool,
) -> Result<BuiltCatalog> {
  let mut catalog = Catalog::new();
  catalog.insert(CodePoint::no_parent());

  let path = resources.script_ranges();
  let text = lineage_sources::read(&path).map_err(Error::in_file(&path))?;
  let ranges = ucd::parse_script_ranges(&text).map_err(Error::in_file(&path))?;
  apply_script_ranges(&mut catalog, &ranges, scripts)?;

  let path = resources.unicode_data();
  let text = lineage_sources::read(&path).map_err(Error::in_file(&path))?;
  let records = ucd::parse_unicode_data(&text).map_err(Error::in_file(&path))?;
  apply_unicode_data(&mut catalog, &records);
  info!(code_points = catalog.len(), "unicode data catalogued");

  let path = resources.private_use();
  let mut private = match lineage_sources::read_optional(&path).map_err(Error::in_file(&path))? {
    Some(text) => private_use::parse(&text).map_err(Error::in_file(&path))?,
    None => {
      info!(path = %path.display(), "no private-use table");
      Vec::new()
    }
  };
  private.extend_from_slice(synthesized);
  apply_private_use(&mut catalog, &private, scripts)?;

  let path = resources.standard_alphabets();
  let mut alphabets = match lineage_sources::read_optional(&path).map_err(Error::in_file(&path))? {
    Some(text) => alphabet::parse(&text).map_err(Error::in_file(&path))?,
    None => {
      info!(path = %path.display(), "no curated standard alphabets");
      Vec::new()
    }
  };
  alphabets.extend_from_slice(generated);
  let alphabet_scripts = stamp_alphabets(&mut catalog, &alphabets, scripts, verify);

  info!(
    code_points = catalog.len(),
    private_use = private.len(),
    alphabets = alphabet_scripts.len(),
    "catalog built"
  );
  Ok(BuiltCatalog { catalog, alphabet_scripts })
}

// ─── Stages ──────────────────────────────────────────────────────────────────

/// Give every value of every range a record owned by its script. The first
/// range to mention a value wins.
pub fn apply_script_ranges(
  catalog: &mut Catalog,
  ranges: &[ScriptRange],
  scripts: &ScriptRegistry,
) -> Result<()> {
  for range in ranges {
    let code = scripts.code_for_name(&range.script_name).ok_or_else(|| Error::UnknownScript {
      context: "Scripts.txt".to_owned(),
      label:   range.script_name.clone(),
    })?;
    for id in range.start..=range.end {
      catalog.insert(CodePoint::new(id, code));
    }
  }
  Ok(())
}

/// Update (or create, owned by `Zzzz`) the record of every `UnicodeData.txt`
/// entry and collect its decomposition components.
pub fn apply_unicode_data(catalog: &mut Catalog, records: &[UnicodeRecord]) {
  for record in records {
    let cp = catalog.entry_or_insert(record.id, UNKNOWN_SCRIPT);
    cp.name = record.name.clone();
    if let Some(category) = &record.general_category {
      cp.general_category = category.clone();
    }
    if let Some(bidi) = &record.bidi_class {
      cp.bidi_class = bidi.clone();
    }
    cp.uppercase = record.uppercase;
    cp.lowercase = record.lowercase;
    cp.decomposition_kind = record.decomposition.as_ref().map(|d| d.kind);

    let Some(decomposition) = &record.decomposition else { continue };
    for (order, &component) in (1..).zip(&decomposition.components) {
      catalog.add_decomposition(Decomposition { code_point: record.id, component, order });
    }
  }
}

/// Inject project-defined characters. Their script must already be
/// registered.
pub fn apply_private_use(
  catalog: &mut Catalog,
  records: &[PrivateUseRecord],
  scripts: &ScriptRegistry,
) -> Result<()> {
  for record in records {
    if !scripts.contains(&record.script_code) {
      return Err(Error::UnknownScript {
        context: "private-use table".to_owned(),
        label:   record.script_code.clone(),
      });
    }
    let cp = catalog.entry_or_insert(record.id, &record.script_code);
    cp.script_code = record.script_code.clone();
    cp.name = Some(record.name.clone());
    cp.general_category = record.general_category.clone();
  }
  Ok(())
}

/// Clear every ordinal, then stamp each alphabet in turn. Returns the codes of
/// the scripts that were stamped, without repeats.
pub fn stamp_alphabets(
  catalog: &mut Catalog,
  rows: &[AlphabetRow],
  scripts: &ScriptRegistry,
  verify: bool,
) -> Vec<String> {
  catalog.clear_std_order();

  let mut stamped: Vec<String> = Vec::new();
  for row in rows {
    let Some(script) = scripts.resolve(&row.script) else {
      if verify {
        warn!(script = %row.script, "standard alphabet for unknown script");
      }
      continue;
    };
    let missing = catalog.stamp_std_order(row.chars());
    if !missing.is_empty() {
      let missing: String = missing.into_iter().collect();
      if verify {
        warn!(script = %row.script, %missing, "standard alphabet lists uncatalogued characters");
      } else {
        debug!(script = %row.script, %missing, "standard alphabet lists uncatalogued characters");
      }
    }
    if !stamped.contains(&script.code) {
      stamped.push(script.code.clone());
    }
  }
  stamped
}
