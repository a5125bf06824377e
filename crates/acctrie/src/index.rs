//! Index structure facade: trie, order list and accumulators under one lock

use parking_lot::RwLock;
use tracing::debug;

use crate::accumulator::{next_binding, prev_binding, Accumulator, NO_NEXT, NO_PREV};
use crate::error::{AccTrieError, Result};
use crate::hasher::{HashAlgorithm, SEPARATOR};
use crate::leaf::{Leaf, LeafArena, LeafId};
use crate::order::OrderList;
use crate::proof::QueryProof;
use crate::trie::Trie;
use crate::types::{
    AccumulatorUpdate, DeleteResult, InsertResult, LeafView, NeighborUpdate, RemoveOutcome,
};

/// Accumulator-chained trie.
///
/// Writes take the exclusive lock for the whole operation, so readers never
/// observe a half-updated accumulator triple. All writes are serialized.
#[derive(Debug)]
pub struct AccTrie {
    algorithm: HashAlgorithm,
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    trie: Trie,
    leaves: LeafArena,
    order: OrderList,
}

impl AccTrie {
    /// Create an empty index
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm, inner: RwLock::new(Inner::default()) }
    }

    /// Digest used for accumulators
    pub const fn hash_algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Append `values` to `key`, creating the leaf if needed, and rebind the
    /// accumulators of the leaf and both of its neighbors.
    ///
    /// Repeating an identical insert appends the values again and changes the
    /// accumulator again; inserts are not idempotent.
    pub fn insert<I, S>(&self, key: &[u8], values: I) -> Result<InsertResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_key(key)?;
        let values = collect_values(values)?;
        let result = self.inner.write().insert(self.algorithm, key, values);
        debug!(
            target: "acctrie",
            key = %String::from_utf8_lossy(key),
            created = result.created,
            accumulator = %result.leaf.new,
            "inserted values"
        );
        Ok(result)
    }

    /// Values stored under `key`
    pub fn get(&self, key: &[u8]) -> Option<Vec<String>> {
        let inner = self.inner.read();
        inner.trie.find_leaf(key).map(|id| inner.leaves[id].values.clone())
    }

    /// All leaves in key order
    pub fn list_leaves(&self) -> Vec<LeafView> {
        let inner = self.inner.read();
        inner.order.iter(&inner.leaves).map(|leaf| inner.view(leaf)).collect()
    }

    /// Leaves whose key starts with `prefix`, in key order
    pub fn get_prefix(&self, prefix: &[u8]) -> Vec<LeafView> {
        let inner = self.inner.read();
        inner
            .trie
            .leaves_under(prefix)
            .into_iter()
            .map(|id| inner.view(&inner.leaves[id]))
            .collect()
    }

    /// Membership proof for a stored key, non-membership proof otherwise
    pub fn prove(&self, key: &[u8]) -> QueryProof {
        let inner = self.inner.read();
        if let Some(id) = inner.trie.find_leaf(key) {
            return QueryProof::Membership { leaf: inner.view(&inner.leaves[id]) };
        }
        let (lower, upper) = inner.order.bracket(&inner.leaves, key);
        QueryProof::NonMembership {
            key: key.to_vec(),
            lower: lower.map(|id| inner.view(&inner.leaves[id])),
            upper: upper.map(|id| inner.view(&inner.leaves[id])),
        }
    }

    /// Remove `key` and rebind its neighbors to each other as if it had never
    /// been inserted. Returns `None` when the key is absent.
    pub fn delete(&self, key: &[u8]) -> Result<Option<DeleteResult>> {
        validate_key(key)?;
        let result = self.inner.write().delete(key);
        if let Some(result) = &result {
            debug!(
                target: "acctrie",
                key = %String::from_utf8_lossy(key),
                values = result.values.len(),
                "deleted key"
            );
        }
        Ok(result)
    }

    /// Remove every occurrence of `values` from `key`, deleting the key when
    /// nothing remains. Returns `None` when the key is absent.
    pub fn remove_values<I, S>(&self, key: &[u8], values: I) -> Result<Option<RemoveOutcome>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_key(key)?;
        let values = collect_values(values)?;
        let outcome = self.inner.write().remove_values(self.algorithm, key, &values);
        if let Some(RemoveOutcome::Updated { removed, .. }) = &outcome {
            debug!(
                target: "acctrie",
                key = %String::from_utf8_lossy(key),
                removed = removed.len(),
                "removed values"
            );
        }
        Ok(outcome)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.inner.read().leaves.len()
    }

    /// Whether no key is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of values across all keys
    pub fn total_values(&self) -> usize {
        let inner = self.inner.read();
        inner.order.iter(&inner.leaves).map(|leaf| leaf.values.len()).sum()
    }
}

impl Default for AccTrie {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl Inner {
    fn insert(&mut self, algorithm: HashAlgorithm, key: &[u8], values: Vec<String>) -> InsertResult {
        let (id, created) = self
            .trie
            .find_or_create_leaf(key, || self.leaves.alloc(Leaf::new(key.to_vec(), algorithm)));

        let old = (!created).then(|| self.leaves[id].accumulator.value().to_owned());
        self.leaves[id].values.extend(values);

        // Final neighbors; an existing leaf keeps its place
        self.order.splice(&mut self.leaves, id);
        let (prev, next) = (self.leaves[id].prev, self.leaves[id].next);
        let prev_key = prev.map(|p| self.leaves[p].key.clone());
        let next_key = next.map(|n| self.leaves[n].key.clone());

        let leaf = &mut self.leaves[id];
        leaf.accumulator =
            Accumulator::for_leaf(algorithm, &leaf.values, prev_key.as_deref(), next_key.as_deref());
        let leaf_update = AccumulatorUpdate { old, new: leaf.accumulator.value().to_owned() };

        // A new leaf splits the pair (prev, next): each side drops its binding
        // to the other and binds `key` instead.
        let predecessor = prev.map(|p| {
            let old_binding = if created { next_binding(next_key.as_deref()) } else { key };
            self.rebind(p, old_binding, key)
        });
        let successor = next.map(|n| {
            let old_binding = if created { prev_binding(prev_key.as_deref()) } else { key };
            self.rebind(n, old_binding, key)
        });

        InsertResult { key: key.to_vec(), created, leaf: leaf_update, predecessor, successor }
    }

    fn delete(&mut self, key: &[u8]) -> Option<DeleteResult> {
        let id = self.trie.detach(key)?;
        let (prev, next) = (self.leaves[id].prev, self.leaves[id].next);
        self.order.unlink(&mut self.leaves, id);
        let prev_key = prev.map(|p| self.leaves[p].key.clone());
        let next_key = next.map(|n| self.leaves[n].key.clone());

        let predecessor = prev.map(|p| self.rebind(p, key, next_binding(next_key.as_deref())));
        let successor = next.map(|n| self.rebind(n, key, prev_binding(prev_key.as_deref())));

        let leaf = self.leaves.release(id)?;
        Some(DeleteResult {
            key: leaf.key,
            values: leaf.values,
            accumulator: leaf.accumulator.value().to_owned(),
            predecessor,
            successor,
        })
    }

    fn remove_values(
        &mut self,
        algorithm: HashAlgorithm,
        key: &[u8],
        values: &[String],
    ) -> Option<RemoveOutcome> {
        let id = self.trie.find_leaf(key)?;
        let (prev, next) = (self.leaves[id].prev, self.leaves[id].next);
        let prev_key = prev.map(|p| self.leaves[p].key.clone());
        let next_key = next.map(|n| self.leaves[n].key.clone());

        let leaf = &mut self.leaves[id];
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut leaf.values).into_iter().partition(|v| values.contains(v));
        // A key that never held values is kept unless something was removed
        if kept.is_empty() && !removed.is_empty() {
            return self.delete(key).map(|mut deleted| {
                deleted.values = removed;
                RemoveOutcome::Deleted(deleted)
            });
        }
        leaf.values = kept;

        let old = leaf.accumulator.value().to_owned();
        leaf.accumulator =
            Accumulator::for_leaf(algorithm, &leaf.values, prev_key.as_deref(), next_key.as_deref());
        Some(RemoveOutcome::Updated {
            key: key.to_vec(),
            removed,
            leaf: AccumulatorUpdate { old: Some(old), new: leaf.accumulator.value().to_owned() },
        })
    }

    /// Swap the neighbor binding `old` for `new` in the accumulator of `id`
    fn rebind(&mut self, id: LeafId, old: &[u8], new: &[u8]) -> NeighborUpdate {
        let leaf = &mut self.leaves[id];
        let before = leaf.accumulator.value().to_owned();
        let replaced = leaf.accumulator.replace(old, new);
        debug_assert!(replaced, "neighbor binding missing from accumulator");
        NeighborUpdate { key: leaf.key.clone(), old: before, new: leaf.accumulator.value().to_owned() }
    }

    fn view(&self, leaf: &Leaf) -> LeafView {
        LeafView {
            key: leaf.key.clone(),
            values: leaf.values.clone(),
            accumulator: leaf.accumulator.value().to_owned(),
            prev_key: leaf.prev.map(|p| self.leaves[p].key.clone()),
            next_key: leaf.next.map(|n| self.leaves[n].key.clone()),
        }
    }
}

fn validate_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(AccTrieError::invalid_key(key, "key is empty"));
    }
    if key.contains(&SEPARATOR) {
        return Err(AccTrieError::invalid_key(key, "key contains the reserved separator byte"));
    }
    if key == NO_PREV.as_bytes() || key == NO_NEXT.as_bytes() {
        return Err(AccTrieError::invalid_key(key, "key is a reserved sentinel"));
    }
    Ok(())
}

fn collect_values<I, S>(values: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(|v| {
            let v = v.into();
            if v.as_bytes().contains(&SEPARATOR) {
                Err(AccTrieError::InvalidValue { value: v })
            } else {
                Ok(v)
            }
        })
        .collect()
}
