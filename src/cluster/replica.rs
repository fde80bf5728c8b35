//! The replica entity: one physical copy of a shard, hosted on one node.

use super::keys::{
  BASE_URL_PROP, COLLECTION_PROP, CORE_NAME_PROP, LEADER_PROP, NODE_NAME_PROP,
  PROPERTY_PROP_PREFIX, REPLICA_TYPE_PROP, RESERVED_PROPS, SHARD_ID_PROP, STATE_PROP,
};
use super::types::{ReplicaState, ReplicaType};
use crate::error::{CloudError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Loosely typed property map, as read from and written to the coordination
/// store. Insertion-ordered.
pub type PropMap = serde_json::Map<String, Value>;

/// Immutable description of one replica of one shard.
///
/// Constructed from coordination-store maps (or field by field), validated,
/// and serialized back to the same nested-map shape. "Mutation" is always a
/// new value, see [`Replica::with_state`] and [`Replica::with_leader`].
#[derive(Debug, Clone)]
pub struct Replica {
  name: String,
  node: String,
  core: String,
  collection: String,
  shard: String,
  state: ReplicaState,
  replica_type: ReplicaType,
  is_leader: bool,
  properties: PropMap,
}

impl Replica {
  /// Builds a replica from fully resolved fields, the shape used when cloning
  /// an existing replica with one field overridden. No defaulting runs here;
  /// validation still does. Reserved wire keys are stripped from `properties`
  /// so typed fields never shadow an extension entry.
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    name: impl Into<String>,
    node: impl Into<String>,
    collection: impl Into<String>,
    shard: impl Into<String>,
    core: impl Into<String>,
    is_leader: bool,
    state: ReplicaState,
    replica_type: ReplicaType,
    properties: PropMap,
  ) -> Result<Self> {
    let properties = properties
      .into_iter()
      .filter(|(key, _)| !RESERVED_PROPS.contains(&key.as_str()))
      .collect();

    let replica = Self {
      name: name.into(),
      node: node.into(),
      core: core.into(),
      collection: collection.into(),
      shard: shard.into(),
      state,
      replica_type,
      is_leader,
      properties,
    };
    replica.validate()?;
    Ok(replica)
  }

  /// Builds a replica from a flat property map plus explicitly supplied
  /// identifiers, the shape used when a per-shard snapshot is unpacked.
  ///
  /// `state` defaults to [`ReplicaState::Active`] and `type` to
  /// [`ReplicaType::Nrt`] when absent; the leader flag is decoded by
  /// [`leader_flag`]. Keys not consumed by a typed field land in the
  /// extension properties.
  pub fn from_props(
    name: impl Into<String>,
    collection: impl Into<String>,
    shard: impl Into<String>,
    props: &PropMap,
  ) -> Result<Self> {
    Self::from_details(name.into(), Some(collection.into()), Some(shard.into()), props)
  }

  /// Builds a replica from the nested wire shape: a single-entry map from
  /// replica name to a detail map carrying every field, `collection` and
  /// `shard` included. Inverse of [`Replica::to_map`].
  pub fn from_nested_map(map: &PropMap) -> Result<Self> {
    let mut entries = map.iter();
    let (name, details) = entries
      .next()
      .ok_or_else(|| CloudError::InvalidReplicaMap("nested replica map is empty".to_string()))?;
    if entries.next().is_some() {
      return Err(CloudError::InvalidReplicaMap(
        "nested replica map must hold exactly one replica".to_string(),
      ));
    }

    let details = details.as_object().ok_or_else(|| {
      CloudError::InvalidReplicaMap(format!("replica '{name}' carries no detail map"))
    })?;

    Self::from_details(
      name.clone(),
      string_prop(details, COLLECTION_PROP),
      string_prop(details, SHARD_ID_PROP),
      details,
    )
  }

  // Single extraction-and-defaulting path shared by both map shapes. Reads
  // every field up front instead of deleting keys from the source map.
  fn from_details(
    name: String,
    collection: Option<String>,
    shard: Option<String>,
    details: &PropMap,
  ) -> Result<Self> {
    Self::new(
      name,
      string_prop(details, NODE_NAME_PROP).unwrap_or_default(),
      collection.unwrap_or_default(),
      shard.unwrap_or_default(),
      string_prop(details, CORE_NAME_PROP).unwrap_or_default(),
      leader_flag(details.get(LEADER_PROP)),
      parse_state(details.get(STATE_PROP))?,
      parse_type(details.get(REPLICA_TYPE_PROP))?,
      details.clone(),
    )
  }

  fn validate(&self) -> Result<()> {
    let required: [(&'static str, &str); 5] = [
      ("name", &self.name),
      ("core", &self.core),
      ("collection", &self.collection),
      ("shard", &self.shard),
      ("node", &self.node),
    ];
    for (field, value) in required {
      if value.is_empty() {
        return Err(CloudError::MissingReplicaField(field));
      }
    }
    Ok(())
  }

  /// Unique per-shard replica identifier (the "core node name").
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Name of the cluster member hosting this replica. Cross-references the
  /// externally maintained live-node set.
  pub fn node(&self) -> &str {
    &self.node
  }

  /// Name of the local index core backing this replica.
  pub fn core(&self) -> &str {
    &self.core
  }

  pub fn collection(&self) -> &str {
    &self.collection
  }

  pub fn shard(&self) -> &str {
    &self.shard
  }

  pub fn state(&self) -> ReplicaState {
    self.state
  }

  pub fn replica_type(&self) -> ReplicaType {
    self.replica_type
  }

  pub fn is_leader(&self) -> bool {
    self.is_leader
  }

  /// Extension properties not captured by the typed fields.
  pub fn properties(&self) -> &PropMap {
    &self.properties
  }

  /// The canonical liveness check. A recorded [`ReplicaState::Active`] alone
  /// proves nothing: a crashed node leaves a stale `active` behind in the
  /// store, so the hosting node must also appear in `live_nodes`.
  pub fn is_active(&self, live_nodes: &HashSet<String>) -> bool {
    live_nodes.contains(&self.node) && self.state == ReplicaState::Active
  }

  /// Looks up an extension property.
  pub fn get(&self, name: &str) -> Option<&Value> {
    self.properties.get(name)
  }

  /// Looks up an extension property, falling back to `default` when absent.
  pub fn get_or_default<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
    self.properties.get(name).unwrap_or(default)
  }

  /// Looks up an extension property expected to be a string.
  pub fn get_str(&self, name: &str) -> Option<&str> {
    self.properties.get(name).and_then(Value::as_str)
  }

  /// Looks up a user-settable property by short name, resolving it under the
  /// reserved `property.` prefix unless the caller already prefixed it.
  pub fn property(&self, name: &str) -> Option<&str> {
    if name.starts_with(PROPERTY_PROP_PREFIX) {
      self.get_str(name)
    } else {
      self.get_str(&format!("{PROPERTY_PROP_PREFIX}{name}"))
    }
  }

  /// Base URL of the hosting node, when published.
  pub fn base_url(&self) -> Option<&str> {
    self.get_str(BASE_URL_PROP)
  }

  /// Reachable URL of the backing core: base URL joined with the core name,
  /// one slash between and one trailing, per the node-addressing convention.
  pub fn core_url(&self) -> Option<String> {
    self.base_url().map(|base_url| {
      let mut url = String::with_capacity(base_url.len() + self.core.len() + 2);
      url.push_str(base_url);
      if !url.ends_with('/') {
        url.push('/');
      }
      url.push_str(&self.core);
      url.push('/');
      url
    })
  }

  /// Copy of this replica with a different lifecycle state. State transitions
  /// are driven externally; the entity itself never mutates.
  pub fn with_state(&self, state: ReplicaState) -> Self {
    let mut replica = self.clone();
    replica.state = state;
    replica
  }

  /// Copy of this replica with the leader flag overridden.
  pub fn with_leader(&self, is_leader: bool) -> Self {
    let mut replica = self.clone();
    replica.is_leader = is_leader;
    replica
  }

  /// Serializes to the nested wire shape: `{name: {details...}}` with the
  /// typed fields first in fixed order, then the extension properties.
  /// Null-valued entries are suppressed and a property key that collides
  /// with an already written field is skipped.
  pub fn to_map(&self) -> PropMap {
    let mut details = PropMap::new();
    write_entry(&mut details, CORE_NAME_PROP, Value::String(self.core.clone()));
    write_entry(&mut details, SHARD_ID_PROP, Value::String(self.shard.clone()));
    write_entry(
      &mut details,
      COLLECTION_PROP,
      Value::String(self.collection.clone()),
    );
    write_entry(&mut details, NODE_NAME_PROP, Value::String(self.node.clone()));
    write_entry(
      &mut details,
      REPLICA_TYPE_PROP,
      Value::String(self.replica_type.to_string()),
    );
    write_entry(&mut details, STATE_PROP, Value::String(self.state.to_string()));
    write_entry(&mut details, LEADER_PROP, Value::Bool(self.is_leader));
    for (key, value) in &self.properties {
      write_entry(&mut details, key, value.clone());
    }

    let mut map = PropMap::new();
    map.insert(self.name.clone(), Value::Object(details));
    map
  }
}

// Lifecycle state is intentionally not compared: two replicas differing only
// in state are the same replica.
impl PartialEq for Replica {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
      && self.node == other.node
      && self.core == other.core
      && self.collection == other.collection
      && self.shard == other.shard
      && self.replica_type == other.replica_type
      && self.is_leader == other.is_leader
      && self.properties == other.properties
  }
}

impl Eq for Replica {}

// Hashes a subset of the fields `eq` compares, so equal replicas always hash
// the same. `state` stays out to match equality; `properties` stays out
// because JSON values are unhashable.
impl Hash for Replica {
  fn hash<H: Hasher>(&self, hasher: &mut H) {
    self.name.hash(hasher);
    self.core.hash(hasher);
    self.collection.hash(hasher);
    self.shard.hash(hasher);
    self.node.hash(hasher);
    self.replica_type.hash(hasher);
    self.is_leader.hash(hasher);
  }
}

impl fmt::Display for Replica {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rendered = serde_json::to_string(&self.to_map()).map_err(|_| fmt::Error)?;
    f.write_str(&rendered)
  }
}

/// Decodes a loosely typed leader flag: booleans pass through, a string
/// counts as true only when it equals `"true"` ignoring ASCII case, anything
/// else (absent and null included) is false.
pub fn leader_flag(value: Option<&Value>) -> bool {
  match value {
    Some(Value::Bool(flag)) => *flag,
    Some(Value::String(raw)) => raw.eq_ignore_ascii_case("true"),
    _ => false,
  }
}

fn parse_state(value: Option<&Value>) -> Result<ReplicaState> {
  match value {
    None | Some(Value::Null) => Ok(ReplicaState::default()),
    Some(Value::String(raw)) => ReplicaState::from_str(raw),
    Some(other) => Err(CloudError::UnknownReplicaState(other.to_string())),
  }
}

fn parse_type(value: Option<&Value>) -> Result<ReplicaType> {
  match value {
    None | Some(Value::Null) => Ok(ReplicaType::default()),
    Some(Value::String(raw)) => ReplicaType::from_str(raw),
    Some(other) => Err(CloudError::UnknownReplicaType(other.to_string())),
  }
}

fn string_prop(details: &PropMap, key: &str) -> Option<String> {
  details.get(key).and_then(Value::as_str).map(str::to_string)
}

fn write_entry(details: &mut PropMap, key: &str, value: Value) {
  if value.is_null() || details.contains_key(key) {
    return;
  }
  details.insert(key.to_string(), value);
}
