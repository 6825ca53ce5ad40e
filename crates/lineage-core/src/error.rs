//! Error types for `lineage-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown derivation type: {0:?}")]
  UnknownDerivationType(String),

  #[error("unknown certainty type: {0:?}")]
  UnknownCertainty(String),

  #[error("unknown decomposition tag: {0:?}")]
  UnknownDecompositionTag(String),

  #[error("invalid family configuration: {0}")]
  InvalidFamily(String),

  #[error("family configuration parse error: {0}")]
  FamilyToml(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
