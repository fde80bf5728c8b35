//! Replica lifecycle state and replication role enums.

use crate::error::CloudError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a replica as recorded in the coordination store.
///
/// The recorded state can be stale: a crashed node leaves its replicas
/// `Active` in the store. Liveness decisions must combine the state with the
/// live-node set, never read it alone (see [`super::Replica::is_active`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReplicaState {
  /// Ready to receive updates and queries.
  #[default]
  Active,
  /// Not yet recovering; expected to move to `Recovering` shortly. Also set
  /// best-effort on graceful shutdown.
  Down,
  /// Catching up from the shard leader via peer-sync or full replication.
  Recovering,
  /// Recovery attempts exhausted; needs operator or automatic intervention.
  /// Not terminal: external recovery logic may move it back to `Recovering`.
  RecoveryFailed,
}

impl fmt::Display for ReplicaState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let value = match self {
      ReplicaState::Active => "active",
      ReplicaState::Down => "down",
      ReplicaState::Recovering => "recovering",
      ReplicaState::RecoveryFailed => "recovery_failed",
    };
    write!(f, "{value}")
  }
}

impl FromStr for ReplicaState {
  type Err = CloudError;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    match raw.to_ascii_lowercase().as_str() {
      "active" => Ok(Self::Active),
      "down" => Ok(Self::Down),
      "recovering" => Ok(Self::Recovering),
      "recovery_failed" => Ok(Self::RecoveryFailed),
      _ => Err(CloudError::UnknownReplicaState(raw.to_string())),
    }
  }
}

/// Replication role of a replica.
///
/// Informational for this crate; the protocol obligations below are enforced
/// by the indexing and election machinery, not by the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplicaType {
  /// Indexes locally, supports near-real-time visibility, can lead.
  #[default]
  Nrt,
  /// Logs writes without indexing; can lead after replaying its log, and
  /// behaves as `Nrt` while leading.
  Tlog,
  /// Only replicates from `Nrt`/`Tlog` peers; never leads and does not
  /// participate in elections.
  Pull,
}

impl fmt::Display for ReplicaType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let value = match self {
      ReplicaType::Nrt => "NRT",
      ReplicaType::Tlog => "TLOG",
      ReplicaType::Pull => "PULL",
    };
    write!(f, "{value}")
  }
}

impl FromStr for ReplicaType {
  type Err = CloudError;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    match raw.to_ascii_uppercase().as_str() {
      "NRT" => Ok(Self::Nrt),
      "TLOG" => Ok(Self::Tlog),
      "PULL" => Ok(Self::Pull),
      _ => Err(CloudError::UnknownReplicaType(raw.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{ReplicaState, ReplicaType};
  use std::str::FromStr;

  #[test]
  fn state_renders_lowercase_and_parses_any_case() {
    assert_eq!(ReplicaState::RecoveryFailed.to_string(), "recovery_failed");
    assert_eq!(
      ReplicaState::from_str("RECOVERING").expect("parse state"),
      ReplicaState::Recovering
    );
    assert_eq!(
      ReplicaState::from_str("active").expect("parse state"),
      ReplicaState::Active
    );
  }

  #[test]
  fn type_renders_uppercase_and_parses_any_case() {
    assert_eq!(ReplicaType::Tlog.to_string(), "TLOG");
    assert_eq!(
      ReplicaType::from_str("pull").expect("parse type"),
      ReplicaType::Pull
    );
  }

  #[test]
  fn unknown_strings_rejected() {
    for raw in ["", "actve", "recovery-failed", "standby"] {
      assert!(ReplicaState::from_str(raw).is_err(), "state should fail: {raw}");
    }
    for raw in ["", "NRTX", "replica"] {
      assert!(ReplicaType::from_str(raw).is_err(), "type should fail: {raw}");
    }
  }
}
