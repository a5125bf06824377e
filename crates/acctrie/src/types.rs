//! Results and views handed to the service layer

use serde::{Deserialize, Serialize};

/// Old and new accumulator of one leaf
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorUpdate {
    /// Accumulator before the operation, absent for a freshly created leaf
    pub old: Option<String>,
    /// Accumulator after the operation
    pub new: String,
}

impl AccumulatorUpdate {
    /// Whether the operation changed the accumulator
    pub fn changed(&self) -> bool {
        self.old.as_deref() != Some(self.new.as_str())
    }
}

/// Accumulator change of a neighboring leaf
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborUpdate {
    /// Neighbor key
    #[serde(with = "hex")]
    pub key: Vec<u8>,
    /// Neighbor accumulator before the operation
    pub old: String,
    /// Neighbor accumulator after the operation
    pub new: String,
}

impl NeighborUpdate {
    /// Whether the operation changed the neighbor accumulator
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// Every accumulator observation made by one insert
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertResult {
    /// Inserted key
    #[serde(with = "hex")]
    pub key: Vec<u8>,
    /// Whether the insert created the leaf
    pub created: bool,
    /// The leaf's own accumulator
    pub leaf: AccumulatorUpdate,
    /// Lexicographic predecessor, if any
    pub predecessor: Option<NeighborUpdate>,
    /// Lexicographic successor, if any
    pub successor: Option<NeighborUpdate>,
}

/// Outcome of removing a key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    /// Removed key
    #[serde(with = "hex")]
    pub key: Vec<u8>,
    /// Values the key held
    pub values: Vec<String>,
    /// Accumulator of the removed leaf
    pub accumulator: String,
    /// Former predecessor, now linked to the former successor
    pub predecessor: Option<NeighborUpdate>,
    /// Former successor, now linked to the former predecessor
    pub successor: Option<NeighborUpdate>,
}

/// Outcome of removing individual values from a key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RemoveOutcome {
    /// Values were removed and the key still holds others
    Updated {
        /// Affected key
        #[serde(with = "hex")]
        key: Vec<u8>,
        /// Values actually removed
        removed: Vec<String>,
        /// The leaf's own accumulator
        leaf: AccumulatorUpdate,
    },
    /// No values remained, so the key was deleted
    Deleted(DeleteResult),
}

/// Snapshot of a leaf together with its neighbor bindings.
///
/// This is everything needed to recompute the leaf accumulator, so it doubles
/// as the per-leaf element of a [`QueryProof`](crate::QueryProof).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafView {
    /// Leaf key
    #[serde(with = "hex")]
    pub key: Vec<u8>,
    /// Stored values in insertion order
    pub values: Vec<String>,
    /// Hex accumulator
    pub accumulator: String,
    /// Predecessor key, absent for the first leaf
    #[serde(with = "opt_hex")]
    pub prev_key: Option<Vec<u8>>,
    /// Successor key, absent for the last leaf
    #[serde(with = "opt_hex")]
    pub next_key: Option<Vec<u8>>,
}

mod opt_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        key: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match key {
            Some(key) => serializer.serialize_some(&hex::encode(key)),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_view_json_uses_hex_keys() {
        let view = LeafView {
            key: b"bob".to_vec(),
            values: vec!["f1".to_string()],
            accumulator: "00".to_string(),
            prev_key: Some(b"alice".to_vec()),
            next_key: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["key"], "626f62");
        assert_eq!(json["prev_key"], "616c696365");
        assert!(json["next_key"].is_null());

        let back: LeafView = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn test_fresh_leaf_counts_as_changed() {
        let update = AccumulatorUpdate { old: None, new: "ab".to_string() };
        assert!(update.changed());
    }
}
