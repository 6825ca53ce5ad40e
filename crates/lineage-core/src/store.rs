//! The `LineageStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `lineage-store-sqlite`).
//! The load pipeline builds scripts, the catalog and the derivation graph in
//! memory and hands each one to the store as a single unit of work.

use crate::{
  catalog::Catalog,
  code_point::CodePoint,
  derivation::DerivationEdge,
  graph::DerivationGraph,
  script::ScriptRegistry,
};

/// Abstraction over a persistent lineage knowledge base.
///
/// Every `write_*` / `replace_*` method commits before returning, so a failed
/// load leaves the store at the last completed stage.
pub trait LineageStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Toggle referential integrity checks for subsequent writes.
  fn set_enforce_foreign_keys(&mut self, on: bool) -> Result<(), Self::Error>;

  // ── Stages ────────────────────────────────────────────────────────────

  /// Upsert the derivation-type and certainty-type lookup rows.
  fn write_lookups(&mut self) -> Result<(), Self::Error>;

  /// Upsert scripts. Names and versions are refreshed; codes and ISO ids of
  /// existing rows are left alone.
  fn write_scripts(&mut self, scripts: &ScriptRegistry) -> Result<(), Self::Error>;

  /// Upsert every catalogued code point, insert-or-ignore decomposition
  /// mappings and replace all standard-alphabet ordinals with the catalog's.
  fn write_catalog(&mut self, catalog: &Catalog) -> Result<(), Self::Error>;

  /// Clear the derivation table and write `graph` in its place.
  fn replace_derivations(&mut self, graph: &DerivationGraph) -> Result<(), Self::Error>;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn code_point(&self, id: u32) -> Result<Option<CodePoint>, Self::Error>;

  /// All persisted derivation edges in key order.
  fn derivations(&self) -> Result<Vec<DerivationEdge>, Self::Error>;

  /// Characters of `script_code` that carry a standard-alphabet ordinal but
  /// never appear as a derivation child, in ordinal order.
  fn missing_derivations(&self, script_code: &str) -> Result<Vec<char>, Self::Error>;
}
