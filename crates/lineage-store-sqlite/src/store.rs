//! [`SqliteStore`], the SQLite implementation of [`LineageStore`].

use std::{
  io,
  path::{Path, PathBuf},
};

use lineage_core::{
  catalog::Catalog,
  code_point::CodePoint,
  derivation::{CertaintyType, DerivationEdge, DerivationType},
  graph::DerivationGraph,
  script::ScriptRegistry,
  store::LineageStore,
};
use rusqlite::{Connection, OptionalExtension as _, params};
use strum::IntoEnumIterator as _;
use tracing::debug;

use crate::{
  Error, Result,
  encode::{RawCodePoint, RawEdge, decode_id, encode_kind},
  query::{Cell, QueryResult},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A lineage knowledge base backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path)?;
    Self::init(conn)
  }

  /// Open an in-memory store, useful for testing.
  pub fn open_in_memory() -> Result<Self> { Self::init(Connection::open_in_memory()?) }

  /// Delete the store file at `path`, with its WAL sidecars, and open a fresh
  /// one in its place.
  pub fn recreate(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    for file in [path.to_owned(), sidecar(path, "-wal"), sidecar(path, "-shm")] {
      match std::fs::remove_file(&file) {
        Ok(()) => debug!(path = %file.display(), "removed store file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(Error::Remove { path: file, source }),
      }
    }
    Self::open(path)
  }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn })
  }

  /// Run an arbitrary statement with positional text parameters and collect
  /// every row.
  pub fn query(&self, sql: &str, params: &[String]) -> Result<QueryResult> {
    let mut stmt = self.conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    while let Some(row) = cursor.next()? {
      let cells = (0..width)
        .map(|i| row.get_ref(i).map(Cell::from))
        .collect::<rusqlite::Result<Vec<_>>>()?;
      rows.push(cells);
    }
    Ok(QueryResult { columns, rows })
  }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
  let mut name = path.as_os_str().to_owned();
  name.push(suffix);
  PathBuf::from(name)
}

// ─── LineageStore impl ───────────────────────────────────────────────────────

impl LineageStore for SqliteStore {
  type Error = Error;

  fn set_enforce_foreign_keys(&mut self, on: bool) -> Result<()> {
    self.conn.pragma_update(None, "foreign_keys", on)?;
    Ok(())
  }

  // ── Stages ────────────────────────────────────────────────────────────

  fn write_lookups(&mut self) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut derivation = tx.prepare(
        "INSERT INTO derivation_type (id, name, description) VALUES (?1, ?2, ?3)
         ON CONFLICT (id) DO UPDATE SET name = excluded.name, description = excluded.description",
      )?;
      for t in DerivationType::iter() {
        derivation.execute(params![t.id(), t.to_string(), t.description()])?;
      }

      let mut certainty = tx.prepare(
        "INSERT INTO certainty_type (id, name, description) VALUES (?1, ?2, ?3)
         ON CONFLICT (id) DO UPDATE SET name = excluded.name, description = excluded.description",
      )?;
      for c in CertaintyType::iter() {
        certainty.execute(params![c.id(), c.to_string(), c.description()])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn write_scripts(&mut self, scripts: &ScriptRegistry) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO script (code, iso_id, u_name, u_version_added, u_subversion_added)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (code) DO UPDATE SET
           u_name             = excluded.u_name,
           u_version_added    = excluded.u_version_added,
           u_subversion_added = excluded.u_subversion_added",
      )?;
      for s in scripts.iter() {
        stmt.execute(params![s.code, s.iso_id, s.name, s.version_added, s.subversion_added])?;
      }
    }
    tx.commit()?;
    debug!(count = scripts.len(), "scripts written");
    Ok(())
  }

  fn write_catalog(&mut self, catalog: &Catalog) -> Result<()> {
    let tx = self.conn.transaction()?;
    // case mappings and decompositions point forwards as often as backwards
    tx.pragma_update(None, "defer_foreign_keys", true)?;
    tx.execute("UPDATE code_point SET std_order_num = NULL", [])?;
    {
      let mut upsert = tx.prepare(
        "INSERT INTO code_point (
           id, name, script_code, general_category_code, bidi_class_code,
           simple_uppercase_mapping_id, simple_lowercase_mapping_id,
           decomposition_type, std_order_num
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (id) DO UPDATE SET
           name                        = excluded.name,
           script_code                 = excluded.script_code,
           general_category_code       = excluded.general_category_code,
           bidi_class_code             = excluded.bidi_class_code,
           simple_uppercase_mapping_id = excluded.simple_uppercase_mapping_id,
           simple_lowercase_mapping_id = excluded.simple_lowercase_mapping_id,
           decomposition_type          = excluded.decomposition_type,
           std_order_num               = excluded.std_order_num",
      )?;
      for cp in catalog.iter() {
        upsert.execute(params![
          cp.id,
          cp.name,
          cp.script_code,
          cp.general_category,
          cp.bidi_class,
          cp.uppercase,
          cp.lowercase,
          encode_kind(cp.decomposition_kind),
          cp.std_order,
        ])?;
      }

      let mut decomposition = tx.prepare(
        "INSERT INTO decomposition_mapping (code_point_id, decomposition_id, order_num)
         VALUES (?1, ?2, ?3)
         ON CONFLICT DO NOTHING",
      )?;
      for d in catalog.decompositions() {
        decomposition.execute(params![d.code_point, d.component, d.order])?;
      }
    }
    tx.commit()?;
    debug!(count = catalog.len(), "code points written");
    Ok(())
  }

  fn replace_derivations(&mut self, graph: &DerivationGraph) -> Result<()> {
    let tx = self.conn.transaction()?;
    tx.execute("DELETE FROM code_point_derivation", [])?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO code_point_derivation (
           child_id, parent_id, derivation_type_id, certainty_type_id, source, notes
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      )?;
      for e in graph.edges() {
        stmt.execute(params![
          e.child,
          e.parent,
          e.derivation_type.id(),
          e.certainty.id(),
          e.source,
          e.notes,
        ])?;
      }
    }
    tx.commit()?;
    debug!(count = graph.len(), "derivations written");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  fn code_point(&self, id: u32) -> Result<Option<CodePoint>> {
    let sql = format!("SELECT {} FROM code_point WHERE id = ?1", RawCodePoint::COLUMNS);
    let raw = self.conn.query_row(&sql, params![id], RawCodePoint::from_row).optional()?;
    raw.map(RawCodePoint::into_code_point).transpose()
  }

  fn derivations(&self) -> Result<Vec<DerivationEdge>> {
    let mut stmt = self.conn.prepare(
      "SELECT child_id, parent_id, derivation_type_id, certainty_type_id, source, notes
       FROM code_point_derivation
       ORDER BY child_id, parent_id, derivation_type_id",
    )?;
    let raws = stmt.query_map([], RawEdge::from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawEdge::into_edge).collect()
  }

  fn missing_derivations(&self, script_code: &str) -> Result<Vec<char>> {
    let mut stmt = self.conn.prepare(
      "SELECT cp.id
       FROM code_point cp
       WHERE cp.script_code = ?1
         AND cp.std_order_num IS NOT NULL
         AND NOT EXISTS (
           SELECT 1 FROM code_point_derivation d WHERE d.child_id = cp.id
         )
       ORDER BY cp.std_order_num, cp.id",
    )?;
    let ids = stmt
      .query_map(params![script_code], |row| row.get::<_, i64>(0))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    let ids = ids.into_iter().map(decode_id).collect::<Result<Vec<_>>>()?;
    Ok(ids.into_iter().filter_map(char::from_u32).collect())
  }
}
