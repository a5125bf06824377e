//! Byte-indexed trie mapping keys to leaf slots

use std::collections::BTreeMap;

use crate::leaf::LeafId;

/// One edge-labelled step of a key path.
///
/// A node terminating a key carries the key's leaf slot; it may still have
/// children when the key is a proper prefix of another key.
#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<u8, Box<TrieNode>>,
    leaf: Option<LeafId>,
}

impl TrieNode {
    fn is_empty(&self) -> bool {
        self.leaf.is_none() && self.children.is_empty()
    }

    fn collect_leaves(&self, out: &mut Vec<LeafId>) {
        out.extend(self.leaf);
        for child in self.children.values() {
            child.collect_leaves(out);
        }
    }

    #[cfg(test)]
    fn count(&self) -> usize {
        1 + self.children.values().map(|c| c.count()).sum::<usize>()
    }
}

/// Trie over byte-string keys. Keys passed in are validated non-empty by the caller.
#[derive(Debug, Default)]
pub(crate) struct Trie {
    root: TrieNode,
}

impl Trie {
    /// Walk `key`, creating missing nodes, and return its leaf.
    ///
    /// `create` allocates the leaf when the key has none yet; the flag reports
    /// whether it was called.
    pub(crate) fn find_or_create_leaf(
        &mut self,
        key: &[u8],
        create: impl FnOnce() -> LeafId,
    ) -> (LeafId, bool) {
        let mut current = &mut self.root;
        for byte in key {
            current = &mut **current.children.entry(*byte).or_default();
        }
        match current.leaf {
            Some(id) => (id, false),
            None => {
                let id = create();
                current.leaf = Some(id);
                (id, true)
            }
        }
    }

    /// Walk `key` without creating anything
    pub(crate) fn find_leaf(&self, key: &[u8]) -> Option<LeafId> {
        self.node(key)?.leaf
    }

    /// Leaves whose key starts with `prefix`, in key order
    pub(crate) fn leaves_under(&self, prefix: &[u8]) -> Vec<LeafId> {
        let mut out = Vec::new();
        if let Some(node) = self.node(prefix) {
            node.collect_leaves(&mut out);
        }
        out
    }

    /// Unmark the leaf at `key` and prune nodes left empty
    pub(crate) fn detach(&mut self, key: &[u8]) -> Option<LeafId> {
        fn detach_in(node: &mut TrieNode, key: &[u8]) -> Option<LeafId> {
            let Some((byte, rest)) = key.split_first() else {
                return node.leaf.take();
            };
            let child = node.children.get_mut(byte)?;
            let id = detach_in(child, rest)?;
            if child.is_empty() {
                node.children.remove(byte);
            }
            Some(id)
        }
        detach_in(&mut self.root, key)
    }

    /// Number of nodes including the root
    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.root.count()
    }

    fn node(&self, key: &[u8]) -> Option<&TrieNode> {
        let mut current = &self.root;
        for byte in key {
            current = &**current.children.get(byte)?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::HashAlgorithm;
    use crate::leaf::{Leaf, LeafArena};

    fn insert(trie: &mut Trie, arena: &mut LeafArena, key: &[u8]) -> LeafId {
        trie.find_or_create_leaf(key, || arena.alloc(Leaf::new(key.to_vec(), HashAlgorithm::Sha256)))
            .0
    }

    #[test]
    fn test_find_or_create_is_stable() {
        let mut trie = Trie::default();
        let mut arena = LeafArena::default();
        let a = insert(&mut trie, &mut arena, b"abc");
        let (again, created) = trie.find_or_create_leaf(b"abc", || unreachable!());
        assert_eq!(a, again);
        assert!(!created);
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn test_prefix_keys_coexist() {
        let mut trie = Trie::default();
        let mut arena = LeafArena::default();
        let abc = insert(&mut trie, &mut arena, b"abc");
        let ab = insert(&mut trie, &mut arena, b"ab");

        assert_eq!(trie.find_leaf(b"abc"), Some(abc));
        assert_eq!(trie.find_leaf(b"ab"), Some(ab));
        assert_eq!(trie.find_leaf(b"a"), None);
        assert_eq!(trie.find_leaf(b"abcd"), None);
        assert_eq!(trie.find_leaf(b"x"), None);
    }

    #[test]
    fn test_leaves_under_prefix_in_order() {
        let mut trie = Trie::default();
        let mut arena = LeafArena::default();
        for key in [&b"car"[..], &b"cat"[..], &b"ca"[..], &b"dog"[..], &b"cab"[..]] {
            insert(&mut trie, &mut arena, key);
        }
        let keys: Vec<_> =
            trie.leaves_under(b"ca").into_iter().map(|id| arena[id].key.clone()).collect();
        assert_eq!(keys, vec![b"ca".to_vec(), b"cab".to_vec(), b"car".to_vec(), b"cat".to_vec()]);
        assert!(trie.leaves_under(b"z").is_empty());
    }

    #[test]
    fn test_detach_prunes_empty_nodes() {
        let mut trie = Trie::default();
        let mut arena = LeafArena::default();
        let ab = insert(&mut trie, &mut arena, b"ab");
        let abcd = insert(&mut trie, &mut arena, b"abcd");
        assert_eq!(trie.node_count(), 5);

        assert_eq!(trie.detach(b"abcd"), Some(abcd));
        assert_eq!(trie.node_count(), 3);
        assert_eq!(trie.find_leaf(b"ab"), Some(ab));

        assert_eq!(trie.detach(b"abc"), None);
        assert_eq!(trie.detach(b"ab"), Some(ab));
        assert_eq!(trie.node_count(), 1);
    }
}
