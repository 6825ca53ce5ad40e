//! The in-memory derivation multigraph.

use std::collections::{BTreeMap, BTreeSet};

use sha2::{Digest, Sha256};

use crate::derivation::{CertaintyType, DerivationEdge, EdgeKey};

/// Derivation edges keyed by `(child, parent, derivation_type)`.
///
/// Iteration order is the key order, so everything derived from a graph
/// (persisted rows, fingerprints, reports) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationGraph {
  edges: BTreeMap<EdgeKey, DerivationEdge>,
}

impl DerivationGraph {
  pub fn new() -> Self { Self::default() }

  /// Insert-or-ignore. Returns `false` when an edge with the same key is
  /// already present; the existing edge is kept untouched.
  pub fn insert(&mut self, edge: DerivationEdge) -> bool {
    let key = edge.key();
    if self.edges.contains_key(&key) {
      return false;
    }
    self.edges.insert(key, edge);
    true
  }

  pub fn get(&self, key: &EdgeKey) -> Option<&DerivationEdge> { self.edges.get(key) }

  /// Remove every `Automated` edge between `child` and `parent`, whatever
  /// its derivation type. Returns how many were dropped.
  pub fn remove_automated(&mut self, child: u32, parent: u32) -> usize {
    let before = self.edges.len();
    self.edges.retain(|key, edge| {
      !(key.child == child && key.parent == parent && edge.certainty == CertaintyType::Automated)
    });
    before - self.edges.len()
  }

  /// Whether any edge runs from `child` to `parent`.
  pub fn contains_pair(&self, child: u32, parent: u32) -> bool {
    self.pair_range(child, parent).next().is_some()
  }

  fn pair_range(&self, child: u32, parent: u32) -> impl Iterator<Item = &DerivationEdge> {
    self
      .edges
      .range(
        EdgeKey { child, parent, derivation_type: Default::default() }..,
      )
      .take_while(move |(k, _)| k.child == child && k.parent == parent)
      .map(|(_, e)| e)
  }

  pub fn edges(&self) -> impl Iterator<Item = &DerivationEdge> { self.edges.values() }

  pub fn len(&self) -> usize { self.edges.len() }

  pub fn is_empty(&self) -> bool { self.edges.is_empty() }

  /// Every code point that appears as a child.
  pub fn children(&self) -> BTreeSet<u32> { self.edges.keys().map(|k| k.child).collect() }

  /// Edges whose child and parent are the same code point.
  pub fn self_loops(&self) -> Vec<&DerivationEdge> {
    self.edges().filter(|e| e.child == e.parent).collect()
  }

  /// Unordered pairs `(a, b)` with `a < b` where edges run both ways.
  pub fn two_cycles(&self) -> Vec<(u32, u32)> {
    let pairs: BTreeSet<(u32, u32)> = self.edges.keys().map(|k| (k.child, k.parent)).collect();
    pairs
      .iter()
      .filter(|(c, p)| c < p && pairs.contains(&(*p, *c)))
      .copied()
      .collect()
  }

  /// SHA-256 over the sorted edge rows, hex encoded.
  pub fn fingerprint(&self) -> String {
    let mut hasher = Sha256::new();
    for edge in self.edges() {
      hasher.update(edge.child.to_be_bytes());
      hasher.update(edge.parent.to_be_bytes());
      hasher.update([edge.derivation_type.id(), edge.certainty.id()]);
      for field in [&edge.source, &edge.notes] {
        match field {
          Some(s) => {
            hasher.update([1]);
            hasher.update((s.len() as u64).to_be_bytes());
            hasher.update(s.as_bytes());
          }
          None => hasher.update([0]),
        }
      }
    }
    hex::encode(hasher.finalize())
  }
}

impl FromIterator<DerivationEdge> for DerivationGraph {
  fn from_iter<I: IntoIterator<Item = DerivationEdge>>(iter: I) -> Self {
    let mut graph = Self::new();
    for edge in iter {
      graph.insert(edge);
    }
    graph
  }
}
