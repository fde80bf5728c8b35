//! Cluster-state primitives published through the coordination store.
//!
//! One entity lives here: the per-shard [`Replica`]. Composition into shards
//! and collections, watches, and leader election all happen outside this
//! crate; they consume the accessors and the liveness check exposed below.

pub mod keys;
pub mod replica;
pub mod types;

pub use replica::{PropMap, Replica};
pub use types::{ReplicaState, ReplicaType};
