//! Storage node: owns one index shard and answers the manager's requests

use atindex_acctrie::{AccTrie, InsertResult, LeafView, QueryProof, RemoveOutcome, Result};
use serde::Serialize;
use tracing::info;

use crate::config::Config;

/// Answer to a single-keyword query
#[derive(Clone, Debug, Serialize)]
pub struct QueryResponse {
    /// Stored values, absent when the keyword has no entry
    pub values: Option<Vec<String>>,
    /// Membership or non-membership proof
    pub proof: QueryProof,
}

/// Storage statistics
#[derive(Clone, Debug, Serialize)]
pub struct NodeStats {
    /// Node identifier
    pub id: String,
    /// Node address
    pub address: String,
    /// Stored keywords
    pub keys: usize,
    /// Stored values across all keywords
    pub values: usize,
    /// Accumulator digest
    pub hasher: String,
}

/// Storage node service object.
///
/// The index does its own locking, so the node is shared behind an `Arc`
/// without further synchronization.
#[derive(Debug)]
pub struct StorageNode {
    id: String,
    address: String,
    index: AccTrie,
}

impl StorageNode {
    /// Create a storage node with an empty index
    pub fn new(config: &Config) -> Self {
        info!(id = %config.id, address = %config.address, hasher = %config.hasher, "storage node created");
        Self {
            id: config.id.clone(),
            address: config.address.clone(),
            index: AccTrie::new(config.hasher),
        }
    }

    /// Node identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Node address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Insert `values` under keyword `key`
    pub fn insert_kv(&self, key: &str, values: Vec<String>) -> Result<InsertResult> {
        self.index.insert(key.as_bytes(), values)
    }

    /// Remove `values` from keyword `key`; an empty list removes the keyword
    pub fn delete_kv(&self, key: &str, values: Vec<String>) -> Result<Option<RemoveOutcome>> {
        if values.is_empty() {
            return Ok(self.index.delete(key.as_bytes())?.map(RemoveOutcome::Deleted));
        }
        self.index.remove_values(key.as_bytes(), values)
    }

    /// Values of `key` with a proof of the answer
    pub fn single_keyword_query(&self, key: &str) -> QueryResponse {
        let proof = self.index.prove(key.as_bytes());
        QueryResponse { values: proof.values().map(<[String]>::to_vec), proof }
    }

    /// Leaves under keyword prefix `prefix`
    pub fn prefix_query(&self, prefix: &str) -> Vec<LeafView> {
        self.index.get_prefix(prefix.as_bytes())
    }

    /// All leaves in key order
    pub fn all_leaves(&self) -> Vec<LeafView> {
        self.index.list_leaves()
    }

    /// Stored values across all keywords
    pub fn count_total_values(&self) -> usize {
        self.index.total_values()
    }

    /// Current statistics
    pub fn stats(&self) -> NodeStats {
        NodeStats {
            id: self.id().to_owned(),
            address: self.address().to_owned(),
            keys: self.index.len(),
            values: self.count_total_values(),
            hasher: self.index.hash_algorithm().to_string(),
        }
    }
}
