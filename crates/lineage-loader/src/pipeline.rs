//! The full load: every stage from the script registry to the persisted
//! derivation graph.

use std::path::PathBuf;

use lineage_core::{
  family::{Families, LetterFamily},
  script::{Script, ScriptRegistry},
  store::LineageStore,
};
use lineage_sources::{alphabet, iso15924, unihan};
use tracing::{info, warn};

use crate::{
  Error, Resources, Result,
  audit::{self, CoverageGap},
  catalog,
  cognate::{self, CognateTable},
  derive::{CuratedSet, DerivationGenerator},
  synthesize::synthesize,
};

/// Switches for one load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
  /// Delete the store file and start from an empty schema.
  pub force_overwrite: bool,
  /// Fail on source inconsistencies instead of skipping them.
  pub verify:          bool,
  /// Compute the coverage audit and print statistics after the load.
  pub debug:           bool,
  pub resource_path:   Option<PathBuf>,
  pub query_path:      Option<PathBuf>,
}

/// What a finished load produced.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
  pub scripts:     usize,
  pub code_points: usize,
  pub edges:       usize,
  /// SHA-256 over the persisted edge rows.
  pub fingerprint: String,
  /// Empty unless the load ran with `debug` or `verify`.
  pub coverage:    Vec<CoverageGap>,
}

/// Run every stage against `store`.
///
/// Foreign keys follow `options.verify` for the duration of the load and are
/// switched back on afterwards, whether the load succeeded or not.
pub fn run_load<S: LineageStore>(
  store: &mut S,
  resources: &Resources,
  families: &Families,
  options: &LoadOptions,
) -> Result<LoadReport> {
  store.set_enforce_foreign_keys(options.verify).map_err(Error::store)?;
  let result = load_stages(store, resources, families, options);
  let restored = store.set_enforce_foreign_keys(true).map_err(Error::store);
  let report = result?;
  restored?;
  Ok(report)
}

fn load_stages<S: LineageStore>(
  store: &mut S,
  resources: &Resources,
  families: &Families,
  options: &LoadOptions,
) -> Result<LoadReport> {
  let verify = options.verify;
  info!(resources = %resources.root().display(), verify, "loading");

  store.write_lookups().map_err(Error::store)?;

  // ── Scripts ───────────────────────────────────────────────────────────
  let scripts = read_scripts(resources, families)?;
  store.write_scripts(&scripts).map_err(Error::store)?;
  info!(scripts = scripts.len(), "scripts written");

  // ── Cognates and provisional ancestors ────────────────────────────────
  let mut tables: Vec<(&LetterFamily, CognateTable)> = Vec::new();
  let (mut synthesized, mut generated) = (Vec::new(), Vec::new());
  for family in &families.families {
    let mut table = cognate::load(resources, family, verify)?;
    let synthesis = synthesize(family, &mut table, &scripts);
    write_generated_alphabets(resources, family, &synthesis.alphabets)?;
    synthesized.extend(synthesis.records);
    generated.extend(synthesis.alphabets);
    tables.push((family, table));
  }

  // ── Catalog ───────────────────────────────────────────────────────────
  let built = catalog::build(resources, &scripts, &synthesized, &generated, verify)?;
  store.write_catalog(&built.catalog).map_err(Error::store)?;

  // ── Derivations ───────────────────────────────────────────────────────
  let curated = CuratedSet::read(resources, &scripts)?;
  let traditional = read_traditional_variants(resources)?;

  let mut generator = DerivationGenerator::new(&built.catalog, families, verify);
  let independent = generator.independent_scripts();
  let decompositions = generator.decompositions();
  let case = generator.case_mappings();
  let variants = generator.traditional_variants(&traditional);
  let mut cognates = 0;
  for (family, table) in &tables {
    cognates += generator.cognates(family, table);
  }
  let mut curated_edges = 0;
  for file in &curated.files {
    curated_edges += generator.curated(file, curated.defaults_for(file))?;
  }
  info!(
    independent,
    decompositions,
    case,
    variants,
    cognates,
    curated = curated_edges,
    "derivations generated"
  );

  let graph = generator.finish();
  if verify {
    audit::check_graph(&graph)?;
  }
  store.replace_derivations(&graph).map_err(Error::store)?;

  // ── Audit ─────────────────────────────────────────────────────────────
  let coverage = if options.debug || verify {
    audit::coverage(store, &scripts, &built.alphabet_scripts)?
  } else {
    Vec::new()
  };
  if verify {
    for gap in &coverage {
      warn!(
        script = %gap.script_label,
        missing = gap.missing.len(),
        "standard alphabet not fully derived"
      );
    }
  }

  let fingerprint = graph.fingerprint();
  info!(edges = graph.len(), %fingerprint, "load complete");
  Ok(LoadReport {
    scripts: scripts.len(),
    code_points: built.catalog.len(),
    edges: graph.len(),
    fingerprint,
    coverage,
  })
}

/// The ISO registry plus `Zzzz` and every private fill-in code it lacks.
fn read_scripts(resources: &Resources, families: &Families) -> Result<ScriptRegistry> {
  let path = resources.iso15924();
  let text = lineage_sources::read(&path).map_err(Error::in_file(&path))?;
  let mut scripts: ScriptRegistry =
    iso15924::parse(&text).map_err(Error::in_file(&path))?.into_iter().collect();

  scripts.ensure(Script::unknown());
  for family in &families.families {
    for code in family.fill_in.keys() {
      match Script::private(code) {
        Some(script) => {
          scripts.ensure(script);
        }
        None if !scripts.contains(code) => {
          return Err(Error::UnknownScript {
            context: format!("family {}", family.name),
            label:   code.clone(),
          });
        }
        None => {}
      }
    }
  }
  Ok(scripts)
}

fn write_generated_alphabets(
  resources: &Resources,
  family: &LetterFamily,
  rows: &[alphabet::AlphabetRow],
) -> Result<()> {
  let dir = resources.generated_dir();
  std::fs::create_dir_all(&dir).map_err(Error::io(&dir))?;
  let path = resources.generated_alphabets(&family.name);
  std::fs::write(&path, alphabet::render(rows)).map_err(Error::io(&path))
}

fn read_traditional_variants(resources: &Resources) -> Result<Vec<(u32, u32)>> {
  let path = resources.unihan_variants();
  match lineage_sources::read_optional(&path).map_err(Error::in_file(&path))? {
    Some(text) => unihan::parse_traditional_variants(&text).map_err(Error::in_file(&path)),
    None => {
      info!(path = %path.display(), "no Unihan variants");
      Ok(Vec::new())
    }
  }
}
