//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CloudError>;

#[derive(Debug, Error)]
pub enum CloudError {
  #[error("replica field '{0}' must be present and non-empty")]
  MissingReplicaField(&'static str),

  #[error("unknown replica state: {0}")]
  UnknownReplicaState(String),

  #[error("unknown replica type: {0}")]
  UnknownReplicaType(String),

  #[error("invalid replica map: {0}")]
  InvalidReplicaMap(String),
}
