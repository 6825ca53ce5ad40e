//! The code-point catalog: one record per scalar value plus decomposition
//! mappings.

use std::collections::{BTreeMap, BTreeSet, btree_map::Entry};

use crate::code_point::{CodePoint, Decomposition};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
  code_points:    BTreeMap<u32, CodePoint>,
  decompositions: BTreeSet<Decomposition>,
}

impl Catalog {
  pub fn new() -> Self { Self::default() }

  /// Insert a record only if `id` is not catalogued yet. Returns whether it
  /// was inserted.
  pub fn insert(&mut self, code_point: CodePoint) -> bool {
    match self.code_points.entry(code_point.id) {
      Entry::Occupied(_) => false,
      Entry::Vacant(slot) => {
        slot.insert(code_point);
        true
      }
    }
  }

  /// Existing record for `id`, or a fresh one owned by `script_code`.
  pub fn entry_or_insert(&mut self, id: u32, script_code: &str) -> &mut CodePoint {
    self.code_points.entry(id).or_insert_with(|| CodePoint::new(id, script_code))
  }

  pub fn get(&self, id: u32) -> Option<&CodePoint> { self.code_points.get(&id) }

  pub fn get_mut(&mut self, id: u32) -> Option<&mut CodePoint> { self.code_points.get_mut(&id) }

  pub fn contains(&self, id: u32) -> bool { self.code_points.contains_key(&id) }

  pub fn iter(&self) -> impl Iterator<Item = &CodePoint> { self.code_points.values() }

  pub fn len(&self) -> usize { self.code_points.len() }

  pub fn is_empty(&self) -> bool { self.code_points.is_empty() }

  /// Insert-or-ignore a decomposition component.
  pub fn add_decomposition(&mut self, decomposition: Decomposition) -> bool {
    self.decompositions.insert(decomposition)
  }

  pub fn decompositions(&self) -> impl Iterator<Item = &Decomposition> {
    self.decompositions.iter()
  }

  /// Components of `id` in `(component, order)` order.
  pub fn decomposition_of(&self, id: u32) -> impl Iterator<Item = &Decomposition> {
    self
      .decompositions
      .range(
        Decomposition { code_point: id, component: 0, order: 0 }
          ..=Decomposition { code_point: id, component: u32::MAX, order: u32::MAX },
      )
  }

  pub fn clear_std_order(&mut self) {
    for cp in self.code_points.values_mut() {
      cp.std_order = None;
    }
  }

  /// Stamp 1-based ordinals onto `chars` in order. Characters that are not
  /// catalogued are returned instead of stamped.
  pub fn stamp_std_order(&mut self, chars: impl IntoIterator<Item = char>) -> Vec<char> {
    let mut missing = Vec::new();
    for (ordinal, ch) in (1..).zip(chars) {
      match self.code_points.get_mut(&(ch as u32)) {
        Some(cp) => cp.std_order = Some(ordinal),
        None => missing.push(ch),
      }
    }
    missing
  }

  pub fn in_script<'a>(&'a self, script_code: &'a str) -> impl Iterator<Item = &'a CodePoint> {
    self.iter().filter(move |cp| cp.script_code == script_code)
  }
}
