//! Reserved wire-format keys shared with the coordination store.
//!
//! These exact strings are an external contract; every producer and consumer
//! of the persisted replica shape must agree on them.

pub const CORE_NAME_PROP: &str = "core";
pub const SHARD_ID_PROP: &str = "shard";
pub const COLLECTION_PROP: &str = "collection";
pub const NODE_NAME_PROP: &str = "node_name";
pub const CORE_NODE_NAME_PROP: &str = "core_node_name";
pub const REPLICA_TYPE_PROP: &str = "type";
pub const STATE_PROP: &str = "state";
pub const LEADER_PROP: &str = "leader";
pub const BASE_URL_PROP: &str = "base_url";

/// Prefix under which user-settable replica properties are stored.
pub const PROPERTY_PROP_PREFIX: &str = "property.";

/// Keys consumed by the typed replica fields. Anything else in an incoming
/// map is an extension property.
pub const RESERVED_PROPS: [&str; 8] = [
  CORE_NAME_PROP,
  SHARD_ID_PROP,
  COLLECTION_PROP,
  NODE_NAME_PROP,
  CORE_NODE_NAME_PROP,
  REPLICA_TYPE_PROP,
  STATE_PROP,
  LEADER_PROP,
];
