//! Cluster-state replica model for sharded, replicated search clusters.
//!
//! A [`cluster::Replica`] is the immutable unit of state a coordination store
//! publishes so that routing, leader election, and health checks can reason
//! about where a shard's data lives and whether it is safe to talk to.

pub mod cluster;
pub mod error;

pub use cluster::{PropMap, Replica, ReplicaState, ReplicaType};
pub use error::{CloudError, Result};
