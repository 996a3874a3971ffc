//! Record model shared by the cache and network layers.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::hash::Hash;

/// Trait for entities that can be stored, cached and sent over the network.
///
/// Implementors expose a stable identity used both as the cache key and as the
/// last path segment of single-record endpoints.
pub trait StoreRecord: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Identity type (e.g., numeric id, slug)
  type Id: Clone + Eq + Hash + fmt::Display + Send + Sync;

  /// Unique identity of this record. Never changes once assigned.
  fn id(&self) -> &Self::Id;
}

/// Identity value of an untyped JSON record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
  /// Any JSON number, including negative and fractional ids
  Number(Number),
  Text(String),
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecordId::Number(n) => write!(f, "{}", n),
      RecordId::Text(s) => f.write_str(s),
    }
  }
}

impl From<u64> for RecordId {
  fn from(n: u64) -> Self {
    RecordId::Number(n.into())
  }
}

impl From<&str> for RecordId {
  fn from(s: &str) -> Self {
    // Only canonical integers become numbers; "007" or "+5" keep their exact text
    match s.parse::<i64>() {
      Ok(n) if n.to_string() == s => RecordId::Number(n.into()),
      _ => RecordId::Text(s.to_string()),
    }
  }
}

/// A record whose only known field is its identity; everything else is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
  pub id: RecordId,
  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl JsonRecord {
  /// Record carrying only an identity, used to address single-record endpoints.
  pub fn with_id(id: impl Into<RecordId>) -> Self {
    Self {
      id: id.into(),
      fields: Map::new(),
    }
  }
}

impl StoreRecord for JsonRecord {
  type Id = RecordId;

  fn id(&self) -> &RecordId {
    &self.id
  }
}
