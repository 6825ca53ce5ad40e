//! Locations of the input files under a resource directory.

use std::path::{Path, PathBuf};

/// A resource directory laid out as the loader expects it.
#[derive(Debug, Clone)]
pub struct Resources {
  root: PathBuf,
}

impl Resources {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  pub fn iso15924(&self) -> PathBuf { self.root.join("iso15924.csv") }

  pub fn script_ranges(&self) -> PathBuf { self.unicode_data_dir().join("Scripts.txt") }

  pub fn unicode_data(&self) -> PathBuf { self.unicode_data_dir().join("UnicodeData.txt") }

  pub fn unihan_variants(&self) -> PathBuf { self.unicode_data_dir().join("Unihan_Variants.txt") }

  pub fn private_use(&self) -> PathBuf { self.root.join("private_use.csv") }

  pub fn standard_alphabets(&self) -> PathBuf { self.root.join("standard_alphabets.csv") }

  pub fn derivations_dir(&self) -> PathBuf { self.root.join("derivations") }

  pub fn derivation_defaults(&self) -> PathBuf { self.derivations_dir().join("defaults.csv") }

  /// The cognate table for one letter of a family.
  pub fn letter_table(&self, table_dir: &str, letter: &str) -> PathBuf {
    self.root.join("wikipedia-sourced").join(table_dir).join(format!("{letter}.txt"))
  }

  pub fn generated_dir(&self) -> PathBuf { self.root.join("generated") }

  /// The standard-alphabet file the synthesizer writes for `family`.
  pub fn generated_alphabets(&self, family: &str) -> PathBuf {
    self.generated_dir().join(format!("{family}_alphabets.csv"))
  }

  fn unicode_data_dir(&self) -> PathBuf { self.root.join("unicode-data") }
}
