//! Accumulator-chained trie (AccTrie) for the ATIndex storage nodes
//!
//! An authenticated dictionary keyed on byte strings:
//! - Trie: point and prefix lookup in O(key length)
//! - Order list: every leaf linked to its lexicographic neighbors
//! - Accumulators: each leaf digest binds its values to its neighbors' keys,
//!   so two adjacent leaves attest that no key exists between them
//!
//! ```rust
//! use atindex_acctrie::{AccTrie, HashAlgorithm};
//!
//! let index = AccTrie::new(HashAlgorithm::Sha256);
//! index.insert(b"bob", ["f1"]).unwrap();
//! index.insert(b"alice", ["f2"]).unwrap();
//!
//! assert_eq!(index.get(b"bob"), Some(vec!["f1".to_string()]));
//! let proof = index.prove(b"amy");
//! assert!(proof.verify(HashAlgorithm::Sha256, b"amy"));
//! ```

mod accumulator;
mod error;
mod hasher;
mod index;
mod leaf;
mod order;
mod proof;
mod trie;
mod types;

pub use accumulator::{Accumulator, NO_NEXT, NO_PREV};
pub use error::{AccTrieError, Result};
pub use hasher::{HashAlgorithm, SEPARATOR};
pub use index::AccTrie;
pub use proof::QueryProof;
pub use types::{
    AccumulatorUpdate, DeleteResult, InsertResult, LeafView, NeighborUpdate, RemoveOutcome,
};

#[cfg(test)]
mod proptests;
