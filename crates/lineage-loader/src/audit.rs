//! Post-load integrity checks: whole-graph cycle scan and standard-alphabet
//! coverage.

use lineage_core::{graph::DerivationGraph, script::ScriptRegistry, store::LineageStore};
use tracing::debug;

use crate::{Error, Result};

/// Reject a graph that holds self-loops or reciprocal pairs.
pub fn check_graph(graph: &DerivationGraph) -> Result<()> {
  let loops = graph.self_loops();
  if let Some(edge) = loops.first() {
    return Err(Error::Integrity(format!(
      "{} self-derivation(s), first at U+{:04X}",
      loops.len(),
      edge.child
    )));
  }

  let cycles = graph.two_cycles();
  if let Some((a, b)) = cycles.first() {
    return Err(Error::Integrity(format!(
      "{} reciprocal pair(s), first between U+{a:04X} and U+{b:04X}",
      cycles.len()
    )));
  }
  Ok(())
}

/// Standard-alphabet characters of one script that no derivation explains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageGap {
  pub script_label: String,
  pub missing:      Vec<char>,
}

/// Coverage gaps for every script in `alphabet_scripts`, in that order.
/// Scripts with full coverage are left out.
pub fn coverage<S: LineageStore>(
  store: &S,
  scripts: &ScriptRegistry,
  alphabet_scripts: &[String],
) -> Result<Vec<CoverageGap>> {
  let mut gaps = Vec::new();
  for code in alphabet_scripts {
    let missing = store.missing_derivations(code).map_err(Error::store)?;
    if missing.is_empty() {
      debug!(script = %code, "standard alphabet fully derived");
      continue;
    }
    gaps.push(CoverageGap { script_label: scripts.label(code).to_owned(), missing });
  }
  Ok(gaps)
}
