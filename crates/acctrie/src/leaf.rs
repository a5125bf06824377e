//! Leaf records and the arena that owns them

use std::ops::{Index, IndexMut};

use crate::accumulator::Accumulator;
use crate::hasher::HashAlgorithm;

/// Slot of a leaf in the [`LeafArena`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LeafId(usize);

/// Terminal record for one stored key
#[derive(Clone, Debug)]
pub(crate) struct Leaf {
    pub(crate) key: Vec<u8>,
    pub(crate) values: Vec<String>,
    pub(crate) accumulator: Accumulator,
    pub(crate) prev: Option<LeafId>,
    pub(crate) next: Option<LeafId>,
}

impl Leaf {
    pub(crate) fn new(key: Vec<u8>, algorithm: HashAlgorithm) -> Self {
        Self { key, values: Vec::new(), accumulator: Accumulator::new(algorithm), prev: None, next: None }
    }
}

/// Growable slot storage; released slots are reused
#[derive(Debug, Default)]
pub(crate) struct LeafArena {
    slots: Vec<Option<Leaf>>,
    free: Vec<usize>,
}

impl LeafArena {
    pub(crate) fn alloc(&mut self, leaf: Leaf) -> LeafId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(leaf);
                LeafId(slot)
            }
            None => {
                self.slots.push(Some(leaf));
                LeafId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn release(&mut self, id: LeafId) -> Option<Leaf> {
        let leaf = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(leaf)
    }

    /// Number of live leaves
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl Index<LeafId> for LeafArena {
    type Output = Leaf;

    fn index(&self, id: LeafId) -> &Leaf {
        self.slots[id.0].as_ref().unwrap_or_else(|| panic!("leaf slot {} was released", id.0))
    }
}

impl IndexMut<LeafId> for LeafArena {
    fn index_mut(&mut self, id: LeafId) -> &mut Leaf {
        self.slots[id.0].as_mut().unwrap_or_else(|| panic!("leaf slot {} was released", id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_released_slot_is_reused() {
        let mut arena = LeafArena::default();
        let a = arena.alloc(Leaf::new(b"a".to_vec(), HashAlgorithm::Sha256));
        let b = arena.alloc(Leaf::new(b"b".to_vec(), HashAlgorithm::Sha256));
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.release(a).map(|l| l.key), Some(b"a".to_vec()));
        assert!(arena.release(a).is_none());
        assert_eq!(arena.len(), 1);

        let c = arena.alloc(Leaf::new(b"c".to_vec(), HashAlgorithm::Sha256));
        assert_eq!(c, a);
        assert_eq!(arena[c].key, b"c");
        assert_eq!(arena[b].key, b"b");
    }
}
