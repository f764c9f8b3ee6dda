//! Retrieval records and ranked neighbor hits.
//!
//! A record is an opaque JSON object (typically a reaction with known
//! inputs and outputs). Record `i` of a store pairs with row `i` of the
//! embedding matrix the index was built from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the indexed corpus. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionRecord(Value);

impl ReactionRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Look up a top-level string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Single-line JSON rendering, as stored in the record file.
    pub fn to_compact_string(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for ReactionRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A single search hit: the record plus its squared L2 distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Squared Euclidean distance (smaller = more similar).
    pub distance: f32,
    /// Row of the embedding matrix / line of the record store.
    pub row: usize,
    pub record: ReactionRecord,
}
