//! The derivation-edge generator.
//!
//! Sources are applied in a fixed order:
//!
//! 1. independent scripts → `NO_PARENT`
//! 2. decomposition mappings
//! 3. case mappings
//! 4. Unihan traditional variants
//! 5. cognate tables
//! 6. curated per-script files
//!
//! Stages 2–5 are automatic: insert-or-ignore, certainty `Automated`, never
//! for a child in an independent script. Curated rows replace automatic
//! edges between the same pair.

use std::{
  collections::BTreeMap,
  io,
  path::{Path, PathBuf},
};

use lineage_core::{
  catalog::Catalog,
  code_point::NO_PARENT,
  defaults::resolve_field,
  derivation::{CertaintyType, DerivationEdge, DerivationType},
  family::{Families, LetterFamily},
  graph::DerivationGraph,
  script::ScriptRegistry,
};
use lineage_sources::curated::{self, CuratedRow, ScriptDefaults, split_slash};
use tracing::{debug, info, warn};

use crate::{Error, Resources, Result, cognate::CognateTable};

pub const DECOMPOSITION_SOURCE: &str = "Unicode Character Database decomposition data";
pub const CASE_SOURCE: &str = "Unicode Character Database case mapping data";
pub const UNIHAN_SOURCE: &str = "Unihan Database";
pub const COGNATE_SOURCE: &str = "Wikipedia letter cognate charts";

const COGNATE_NOTES: &str = "Not necessarily graphical derivation but likely";
const INDEPENDENT_NOTES: &str = "Independent script: Assume independent character";

const LAST_RESORT_CERTAINTY: &str = "Unspecified";
const NO_PARENT_CERTAINTY: &str = "Uncertain";
const LAST_RESORT_TYPE: &str = "Derivation";

// ─── Curated files ───────────────────────────────────────────────────────────

/// One `derivations/<Script>.csv` file.
#[derive(Debug, Clone)]
pub struct CuratedFile {
  pub path:        PathBuf,
  /// File stem as written.
  pub label:       String,
  /// The script the stem resolves to, if any.
  pub script_code: Option<String>,
  pub rows:        Vec<CuratedRow>,
}

impl CuratedFile {
  /// Key into [`CuratedSet::defaults`]: the script code when the label
  /// resolves, the label otherwise.
  pub fn defaults_key(&self) -> &str { self.script_code.as_deref().unwrap_or(&self.label) }
}

/// Every curated derivation file plus the script-wide defaults.
#[derive(Debug, Clone, Default)]
pub struct CuratedSet {
  pub defaults: BTreeMap<String, ScriptDefaults>,
  /// In file-name order.
  pub files:    Vec<CuratedFile>,
}

impl CuratedSet {
  /// Read `derivations/`. A missing directory is an empty set.
  pub fn read(resources: &Resources, scripts: &ScriptRegistry) -> Result<Self> {
    let dir = resources.derivations_dir();
    let entries = match std::fs::read_dir(&dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        info!(path = %dir.display(), "no curated derivations");
        return Ok(Self::default());
      }
      Err(source) => return Err(Error::Io { path: dir, source }),
    };

    let defaults_path = resources.derivation_defaults();
    let mut paths = Vec::new();
    for entry in entries {
      let path = entry.map_err(Error::io(&dir))?.path();
      if path.extension().is_some_and(|ext| ext == "csv") && path != defaults_path {
        paths.push(path);
      }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
      let text = lineage_sources::read(&path).map_err(Error::in_file(&path))?;
      let rows = curated::parse_rows(&text).map_err(Error::in_file(&path))?;
      let label = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
      let script_code = scripts.resolve(&label).map(|s| s.code.clone());
      files.push(CuratedFile { path, label, script_code, rows });
    }

    let defaults = match lineage_sources::read_optional(&defaults_path)
      .map_err(Error::in_file(&defaults_path))?
    {
      Some(text) => curated::parse_defaults(&text)
        .map_err(Error::in_file(&defaults_path))?
        .into_iter()
        .map(|(label, defaults)| {
          let key = scripts.resolve(&label).map_or(label, |s| s.code.clone());
          (key, defaults)
        })
        .collect(),
      None => BTreeMap::new(),
    };

    debug!(files = files.len(), defaults = defaults.len(), "curated derivations read");
    Ok(Self { defaults, files })
  }

  pub fn defaults_for(&self, file: &CuratedFile) -> Option<&ScriptDefaults> {
    self.defaults.get(file.defaults_key())
  }
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Accumulates the derivation graph stage by stage over a finished catalog.
pub struct DerivationGenerator<'a> {
  catalog:  &'a Catalog,
  families: &'a Families,
  verify:   bool,
  graph:    DerivationGraph,
}

impl<'a> DerivationGenerator<'a> {
  pub fn new(catalog: &'a Catalog, families: &'a Families, verify: bool) -> Self {
    Self { catalog, families, verify, graph: DerivationGraph::new() }
  }

  pub fn graph(&self) -> &DerivationGraph { &self.graph }

  pub fn finish(self) -> DerivationGraph { self.graph }

  // ── Automatic sources ─────────────────────────────────────────────────

  /// Every character of an independent script derives from `NO_PARENT`.
  pub fn independent_scripts(&mut self) -> usize {
    let catalog = self.catalog;
    let mut added = 0;
    for cp in catalog.iter() {
      if cp.id == NO_PARENT as u32 || !self.families.is_independent(&cp.script_code) {
        continue;
      }
      let edge =
        DerivationEdge::automated(cp.id, NO_PARENT as u32, DerivationType::Derivation, None)
          .with_notes(INDEPENDENT_NOTES);
      if self.graph.insert(edge) {
        added += 1;
      }
    }
    added
  }

  /// Decomposition components are parents of the composed character.
  /// Separators, controls and unassigned code points take no part.
  pub fn decompositions(&mut self) -> usize {
    let catalog = self.catalog;
    let mut eligible: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for d in catalog.decompositions() {
      let (Some(child), Some(parent)) = (catalog.get(d.code_point), catalog.get(d.component))
      else {
        continue;
      };
      if child.is_layout_category() || parent.is_layout_category() {
        continue;
      }
      eligible.entry(d.code_point).or_default().push(d.component);
    }

    let mut added = 0;
    for (child, components) in eligible {
      let kind = catalog.get(child).and_then(|cp| cp.decomposition_kind);
      let derivation_type = match (components.as_slice(), kind) {
        ([_], Some(kind)) if kind.is_canonical() => DerivationType::Duplicate,
        ([_], Some(kind)) if kind.is_stylistic_variant() => DerivationType::Copy,
        _ => DerivationType::Derivation,
      };
      for parent in components {
        let edge =
          DerivationEdge::automated(child, parent, derivation_type, Some(DECOMPOSITION_SOURCE));
        if self.add_automated(edge) {
          added += 1;
        }
      }
    }
    added
  }

  /// Lowercase derives from uppercase: every character points at its simple
  /// uppercase, and every character's simple lowercase points back at it when
  /// that lowercase maps up to some other character. A lowercase with no
  /// uppercase of its own gets no edge.
  pub fn case_mappings(&mut self) -> usize {
    let catalog = self.catalog;
    let mut added = 0;
    for cp in catalog.iter() {
      if let Some(upper) = cp.uppercase
        && upper != cp.id
        && self.add_automated(case_edge(cp.id, upper))
      {
        added += 1;
      }
    }
    for cp in catalog.iter() {
      let Some(lower) = cp.lowercase else { continue };
      if lower == cp.id {
        continue;
      }
      let elsewhere =
        matches!(catalog.get(lower).and_then(|l| l.uppercase), Some(u) if u != cp.id);
      if elsewhere && self.add_automated(case_edge(lower, cp.id)) {
        added += 1;
      }
    }
    added
  }

  /// Simplified characters derive from their traditional forms.
  pub fn traditional_variants(&mut self, pairs: &[(u32, u32)]) -> usize {
    let mut added = 0;
    for &(simplified, traditional) in pairs {
      if simplified == traditional {
        continue;
      }
      let edge = DerivationEdge::automated(
        simplified,
        traditional,
        DerivationType::Simplification,
        Some(UNIHAN_SOURCE),
      );
      if self.add_automated(edge) {
        added += 1;
      }
    }
    added
  }

  /// For every non-terminal script of the family tree and every letter both
  /// it and its parent script show, link the child's characters to the
  /// parent's single character.
  pub fn cognates(&mut self, family: &LetterFamily, table: &CognateTable) -> usize {
    let mut added = 0;
    for (child_code, parent_code) in &family.parents {
      if family.is_terminal(child_code) {
        continue;
      }
      for (ordinal, letter) in (0..).zip(&family.letters) {
        let children = table.chars(child_code, ordinal);
        let parents = table.chars(parent_code, ordinal);
        if children.is_empty() || parents.is_empty() {
          continue;
        }
        let [parent] = parents else {
          if self.verify {
            warn!(
              script = %child_code,
              %letter,
              candidates = %parents.iter().collect::<String>(),
              "multiple possible parents, leaving for manual curation"
            );
          }
          continue;
        };
        for &child in children {
          if child == *parent {
            continue;
          }
          let edge = DerivationEdge::automated(
            child as u32,
            *parent as u32,
            DerivationType::Derivation,
            Some(COGNATE_SOURCE),
          )
          .with_notes(COGNATE_NOTES);
          if self.add_automated(edge) {
            added += 1;
          }
        }
      }
    }
    added
  }

  fn add_automated(&mut self, edge: DerivationEdge) -> bool {
    let Some(child) = self.catalog.get(edge.child) else {
      debug!(child = edge.child, "skipping edge from uncatalogued child");
      return false;
    };
    if !self.catalog.contains(edge.parent) {
      debug!(parent = edge.parent, "skipping edge to uncatalogued parent");
      return false;
    }
    if self.families.is_independent(&child.script_code) {
      return false;
    }
    self.graph.insert(edge)
  }

  // ── Curated ───────────────────────────────────────────────────────────

  /// Apply one curated file. Each row's fields resolve through
  /// [`resolve_field`]: the row, then `defaults`, then a last resort.
  pub fn curated(&mut self, file: &CuratedFile, defaults: Option<&ScriptDefaults>) -> Result<usize> {
    let expected = match (&file.script_code, self.verify) {
      (Some(code), _) => Some(code.as_str()),
      (None, true) => {
        return Err(Error::UnknownScript {
          context: file.path.display().to_string(),
          label:   file.label.clone(),
        });
      }
      (None, false) => None,
    };

    let mut added = 0;
    for row in &file.rows {
      added += self.curated_row(file, row, expected, defaults)?;
    }
    debug!(file = %file.label, added, "curated derivations applied");
    Ok(added)
  }

  fn curated_row(
    &mut self,
    file: &CuratedFile,
    row: &CuratedRow,
    expected: Option<&str>,
    defaults: Option<&ScriptDefaults>,
  ) -> Result<usize> {
    let path = &file.path;
    let line = row.line;
    let child = single_char(path, line, &row.child)?;
    if self.verify {
      self.check_catalogued(path, line, child)?;
      if let (Some(expected), Some(cp)) = (expected, self.catalog.get(child as u32))
        && cp.script_code != expected
      {
        return Err(Error::WrongScript {
          path: path.clone(),
          line,
          character: child,
          id: child as u32,
          expected: expected.to_owned(),
          actual: cp.script_code.clone(),
        });
      }
    }

    let parent_cells = row.parents();
    let parents = if parent_cells.is_empty() {
      vec![NO_PARENT]
    } else {
      parent_cells.iter().map(|cell| single_char(path, line, cell)).collect::<Result<Vec<_>>>()?
    };

    let fallback = ScriptDefaults::default();
    let defaults = defaults.unwrap_or(&fallback);
    let certainty = resolve_field(
      row.certainty.as_deref(),
      defaults.certainty.as_deref(),
      Some(LAST_RESORT_CERTAINTY),
      parent_cells.is_empty(),
      Some(NO_PARENT_CERTAINTY),
    );
    let certainty = CertaintyType::parse_cell(certainty.unwrap_or(LAST_RESORT_CERTAINTY))?;
    // an Assumed derivation is sourceless unless the row itself cites one
    let source = resolve_field(
      row.source.as_deref(),
      defaults.source.as_deref(),
      None,
      certainty == CertaintyType::Assumed,
      None,
    );
    let notes = resolve_field(row.notes.as_deref(), defaults.notes.as_deref(), None, false, None);
    let types = resolve_field(
      row.derivation_type.as_deref(),
      defaults.derivation_type.as_deref(),
      Some(LAST_RESORT_TYPE),
      false,
      None,
    );
    let mut types =
      split_slash(types).into_iter().map(DerivationType::parse_cell).collect::<Result<Vec<_>, _>>()?;
    if types.is_empty() {
      types.push(DerivationType::Derivation);
    }

    let mut added = 0;
    for parent in parents {
      if child == parent {
        if self.verify {
          return Err(Error::SelfDerivation {
            path: path.clone(),
            line,
            character: child,
            id: child as u32,
          });
        }
        warn!(path = %path.display(), line, %child, "skipping self-derivation");
        continue;
      }
      if self.verify {
        self.check_catalogued(path, line, parent)?;
        if self.graph.contains_pair(parent as u32, child as u32) {
          return Err(Error::TwoCycle { path: path.clone(), line, child, parent });
        }
      }

      let superseded = self.graph.remove_automated(child as u32, parent as u32);
      if superseded > 0 {
        debug!(%child, %parent, superseded, "curated row replaces automated edges");
      }
      for &derivation_type in &types {
        let edge = DerivationEdge {
          child: child as u32,
          parent: parent as u32,
          derivation_type,
          certainty,
          source: source.map(str::to_owned),
          notes: notes.map(str::to_owned),
        };
        if self.graph.insert(edge) {
          added += 1;
        } else if self.verify {
          warn!(
            path = %path.display(),
            line,
            %child,
            %parent,
            %derivation_type,
            "duplicate derivation"
          );
        }
      }
    }
    Ok(added)
  }

  fn check_catalogued(&self, path: &Path, line: usize, ch: char) -> Result<()> {
    if self.catalog.contains(ch as u32) {
      return Ok(());
    }
    Err(Error::Uncatalogued { path: path.to_owned(), line, character: ch, id: ch as u32 })
  }
}

fn case_edge(child: u32, parent: u32) -> DerivationEdge {
  DerivationEdge::automated(child, parent, DerivationType::Derivation, Some(CASE_SOURCE))
}

fn single_char(path: &Path, line: usize, cell: &str) -> Result<char> {
  let mut chars = cell.chars();
  match (chars.next(), chars.next()) {
    (Some(ch), None) => Ok(ch),
    _ => Err(Error::NotACharacter { path: path.to_owned(), line, value: cell.to_owned() }),
  }
}

#[cfg(test)]
mod tests {
  use lineage_core::{
    code_point::{CodePoint, Decomposition, DecompositionKind},
    derivation::EdgeKey,
  };

  use super::*;

  const RING: char = '\u{C5}';
  const ANGSTROM: char = '\u{212B}';

  fn families() -> Families {
    Families::from_toml(
      r#"
      independent_scripts = ["Vaii"]

      [[family]]
      name = "mini"
      table_dir = "mini"
      letters = ["Ka", "Kha"]
      terminal = ["Brah"]
      parents = { Deva = "Brah", Brah = "Qaaa" }
      "#,
    )
    .unwrap()
  }

  fn cp(ch: char, script: &str, category: &str) -> CodePoint {
    let mut cp = CodePoint::new(ch as u32, script);
    cp.general_category = category.into();
    cp
  }

  fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(CodePoint::no_parent());
    for (ch, category) in [('A', "Lu"), ('a', "Ll"), (RING, "Lu"), (ANGSTROM, "Lu"), ('ª', "Lo")] {
      catalog.insert(cp(ch, "Latn", category));
    }
    catalog.insert(cp('\u{A000}', "Vaii", "Lo"));
    catalog.insert(cp('\u{A001}', "Vaii", "Lo"));
    catalog.insert(cp(' ', "Zyyy", "Zs"));
    catalog.insert(cp('\u{A0}', "Zyyy", "Zs"));
    catalog
  }

  fn key(child: char, parent: char, derivation_type: DerivationType) -> EdgeKey {
    EdgeKey { child: child as u32, parent: parent as u32, derivation_type }
  }

  fn curated_file(rows: Vec<CuratedRow>) -> CuratedFile {
    CuratedFile {
      path: PathBuf::from("derivations/Latin.csv"),
      label: "Latin".into(),
      script_code: Some("Latn".into()),
      rows,
    }
  }

  fn row(child: &str, parent: Option<&str>) -> CuratedRow {
    CuratedRow {
      line:            2,
      child:           child.into(),
      parent:          parent.map(Into::into),
      derivation_type: None,
      certainty:       None,
      source:          None,
      notes:           None,
    }
  }

  #[test]
  fn independent_scripts_point_at_the_sentinel_only() {
    let families = families();
    let mut catalog = catalog();
    catalog.get_mut(0xA001).unwrap().uppercase = Some(0xA000);
    let mut generator = DerivationGenerator::new(&catalog, &families, true);
    assert_eq!(generator.independent_scripts(), 2);
    assert_eq!(generator.case_mappings(), 0);

    let graph = generator.finish();
    let edge = graph.get(&key('\u{A000}', NO_PARENT, DerivationType::Derivation)).unwrap();
    assert_eq!(edge.certainty, CertaintyType::Automated);
    assert_eq!(edge.source, None);
    assert_eq!(edge.notes.as_deref(), Some(INDEPENDENT_NOTES));
    assert_eq!(graph.len(), 2);
  }

  #[test]
  fn decomposition_types_follow_component_count_and_kind() {
    let families = families();
    let mut catalog = catalog();
    catalog.get_mut(ANGSTROM as u32).unwrap().decomposition_kind = Some(DecompositionKind::Singleton);
    catalog.get_mut(RING as u32).unwrap().decomposition_kind = Some(DecompositionKind::Canonical);
    catalog.get_mut('ª' as u32).unwrap().decomposition_kind = Some(DecompositionKind::Super);
    catalog.get_mut('\u{A0}' as u32).unwrap().decomposition_kind = Some(DecompositionKind::NoBreak);
    for (code_point, component, order) in [
      (ANGSTROM, RING, 1),
      ('ª', 'a', 1),
      (RING, 'A', 1),
      (RING, '\u{30A}', 2),
      ('\u{A0}', ' ', 1),
    ] {
      catalog.add_decomposition(Decomposition {
        code_point: code_point as u32,
        component: component as u32,
        order,
      });
    }
    // the combining ring is not catalogued, so RING keeps a single component
    let mut generator = DerivationGenerator::new(&catalog, &families, false);
    assert_eq!(generator.decompositions(), 3);

    let graph = generator.finish();
    assert!(graph.get(&key(ANGSTROM, RING, DerivationType::Duplicate)).is_some());
    assert!(graph.get(&key('ª', 'a', DerivationType::Copy)).is_some());
    assert!(graph.get(&key(RING, 'A', DerivationType::Duplicate)).is_some());
    assert!(!graph.contains_pair(0xA0, ' ' as u32));
  }

  #[test]
  fn repeated_component_is_one_derivation_edge() {
    let families = families();
    let mut catalog = catalog();
    catalog.insert(cp('‥', "Zyyy", "Po"));
    catalog.insert(cp('.', "Zyyy", "Po"));
    catalog.get_mut('‥' as u32).unwrap().decomposition_kind = Some(DecompositionKind::Compat);
    for order in [1, 2] {
      catalog.add_decomposition(Decomposition {
        code_point: '‥' as u32,
        component: '.' as u32,
        order,
      });
    }
    let mut generator = DerivationGenerator::new(&catalog, &families, true);
    assert_eq!(generator.decompositions(), 1);
    assert!(generator.graph().get(&key('‥', '.', DerivationType::Derivation)).is_some());
  }

  #[test]
  fn case_mappings_skip_reciprocal_lowercase() {
    let families = families();
    let mut catalog = catalog();
    catalog.get_mut('a' as u32).unwrap().uppercase = Some('A' as u32);
    catalog.get_mut('A' as u32).unwrap().lowercase = Some('a' as u32);
    // RING lowers to a, which does not map back up to it
    catalog.get_mut(RING as u32).unwrap().lowercase = Some('a' as u32);
    catalog.get_mut(RING as u32).unwrap().uppercase = Some(RING as u32);

    let mut generator = DerivationGenerator::new(&catalog, &families, false);
    assert_eq!(generator.case_mappings(), 2);
    let graph = generator.finish();
    let edge = graph.get(&key('a', 'A', DerivationType::Derivation)).unwrap();
    assert_eq!(edge.source.as_deref(), Some(CASE_SOURCE));
    assert!(graph.get(&key('a', RING, DerivationType::Derivation)).is_some());
  }

  #[test]
  fn lowercase_without_an_uppercase_is_not_derived() {
    let families = families();
    let mut catalog = catalog();
    catalog.insert(cp('ß', "Latn", "Ll"));
    catalog.insert(cp('ẞ', "Latn", "Lu"));
    catalog.get_mut('ẞ' as u32).unwrap().lowercase = Some('ß' as u32);

    let mut generator = DerivationGenerator::new(&catalog, &families, false);
    assert_eq!(generator.case_mappings(), 0);
    let graph = generator.finish();
    assert!(graph.get(&key('ß', 'ẞ', DerivationType::Derivation)).is_none());
    assert!(graph.get(&key('ẞ', 'ß', DerivationType::Derivation)).is_none());
  }

  #[test]
  fn traditional_variants_drop_self_mappings() {
    let families = families();
    let mut catalog = catalog();
    catalog.insert(cp('个', "Hani", "Lo"));
    catalog.insert(cp('個', "Hani", "Lo"));
    let mut generator = DerivationGenerator::new(&catalog, &families, false);
    let pairs = [('个' as u32, '個' as u32), ('個' as u32, '個' as u32)];
    assert_eq!(generator.traditional_variants(&pairs), 1);
    assert!(generator.graph().get(&key('个', '個', DerivationType::Simplification)).is_some());
  }

  #[test]
  fn cognates_need_a_single_parent_character() {
    let families = families();
    let family = &families.families[0];
    let mut catalog = catalog();
    for ch in ['क', 'ख', '𑀓', '𑀔', '𑀕'] {
      catalog.insert(cp(ch, "Deva", "Lo"));
    }
    let mut table = CognateTable::new("mini");
    table.add_char("Deva", 0, 'क');
    table.add_char("Deva", 1, 'ख');
    table.add_char("Brah", 0, '𑀓');
    table.add_char("Brah", 1, '𑀔');
    table.add_char("Brah", 1, '𑀕');

    let mut generator = DerivationGenerator::new(&catalog, &families, true);
    assert_eq!(generator.cognates(family, &table), 1);
    let graph = generator.finish();
    let edge = graph.get(&key('क', '𑀓', DerivationType::Derivation)).unwrap();
    assert_eq!(edge.source.as_deref(), Some(COGNATE_SOURCE));
    assert_eq!(edge.notes.as_deref(), Some(COGNATE_NOTES));
  }

  #[test]
  fn blank_parent_means_no_parent_with_uncertain_certainty() {
    let families = families();
    let catalog = catalog();
    let mut generator = DerivationGenerator::new(&catalog, &families, true);
    let defaults =
      ScriptDefaults { certainty: None, source: Some("Alphabet book".into()), ..Default::default() };
    generator.curated(&curated_file(vec![row("A", None)]), Some(&defaults)).unwrap();

    let graph = generator.finish();
    let edges: Vec<_> = graph.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].parent, NO_PARENT as u32);
    assert_eq!(edges[0].certainty, CertaintyType::Uncertain);
    assert_eq!(edges[0].source.as_deref(), Some("Alphabet book"));
  }

  #[test]
  fn assumed_certainty_drops_the_default_source() {
    let families = families();
    let catalog = catalog();
    let mut generator = DerivationGenerator::new(&catalog, &families, true);
    let defaults = ScriptDefaults {
      source: Some("Alphabet book".into()),
      certainty: Some("2".into()),
      ..Default::default()
    };
    let mut assumed = row("a", Some("A"));
    assumed.certainty = Some("Assumed".into());
    let mut cited = row("\u{C5}", Some("A"));
    cited.certainty = Some("5".into());
    cited.source = Some("Row citation".into());
    let plain = row("ª", Some("a"));
    generator.curated(&curated_file(vec![assumed, cited, plain]), Some(&defaults)).unwrap();

    let graph = generator.finish();
    let a = graph.get(&key('a', 'A', DerivationType::Derivation)).unwrap();
    assert_eq!((a.certainty, a.source.as_deref()), (CertaintyType::Assumed, None));
    let ring = graph.get(&key(RING, 'A', DerivationType::Derivation)).unwrap();
    assert_eq!(ring.source.as_deref(), Some("Row citation"));
    let ordinal = graph.get(&key('ª', 'a', DerivationType::Derivation)).unwrap();
    assert_eq!(
      (ordinal.certainty, ordinal.source.as_deref()),
      (CertaintyType::Likely, Some("Alphabet book"))
    );
  }

  #[test]
  fn curated_rows_replace_automated_edges_and_expand_slashes() {
    let families = families();
    let mut catalog = catalog();
    catalog.get_mut('a' as u32).unwrap().uppercase = Some('A' as u32);
    let mut generator = DerivationGenerator::new(&catalog, &families, true);
    generator.case_mappings();

    let mut curated = row("a", Some("A/ª"));
    curated.derivation_type = Some("Derivation/Rotation".into());
    curated.certainty = Some("Likely".into());
    assert_eq!(generator.curated(&curated_file(vec![curated]), None).unwrap(), 4);

    let graph = generator.finish();
    assert_eq!(graph.len(), 4);
    let a = graph.get(&key('a', 'A', DerivationType::Derivation)).unwrap();
    assert_eq!(a.certainty, CertaintyType::Likely);
    assert_eq!(a.source, None);
    assert!(graph.get(&key('a', 'ª', DerivationType::Rotation)).is_some());
  }

  #[test]
  fn verification_rejects_bad_curated_rows() {
    let families = families();
    let catalog = catalog();
    let run = |rows: Vec<CuratedRow>| {
      let mut generator = DerivationGenerator::new(&catalog, &families, true);
      generator.curated(&curated_file(rows), None)
    };

    assert!(matches!(run(vec![row("a", Some("a"))]), Err(Error::SelfDerivation { .. })));
    assert!(matches!(
      run(vec![row("a", Some("A")), row("A", Some("a"))]),
      Err(Error::TwoCycle { .. })
    ));
    assert!(matches!(run(vec![row("\u{A000}", None)]), Err(Error::WrongScript { .. })));
    assert!(matches!(run(vec![row("b", None)]), Err(Error::Uncatalogued { .. })));
    assert!(matches!(run(vec![row("ab", None)]), Err(Error::NotACharacter { .. })));
  }

  #[test]
  fn production_mode_skips_self_derivations() {
    let families = families();
    let catalog = catalog();
    let mut generator = DerivationGenerator::new(&catalog, &families, false);
    let rows = vec![row("a", Some("a")), row("b", Some("A"))];
    assert_eq!(generator.curated(&curated_file(rows), None).unwrap(), 1);
    assert!(generator.graph().self_loops().is_empty());
  }
}
