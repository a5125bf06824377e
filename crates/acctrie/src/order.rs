//! Doubly-linked leaf order list, kept in byte-lexicographic key order

use crate::leaf::{Leaf, LeafArena, LeafId};

/// Ends of the order list. Links live on the leaves themselves.
#[derive(Debug, Default)]
pub(crate) struct OrderList {
    head: Option<LeafId>,
    tail: Option<LeafId>,
}

impl OrderList {
    #[cfg(test)]
    pub(crate) const fn head(&self) -> Option<LeafId> {
        self.head
    }

    /// Move `id` to the position that keeps keys strictly increasing.
    ///
    /// The position is found by a linear scan from the head.
    // TODO: replace the scan with an ordered index (e.g. BTreeMap<Vec<u8>, LeafId>)
    // once shards grow past a few thousand keys.
    pub(crate) fn splice(&mut self, leaves: &mut LeafArena, id: LeafId) {
        self.unlink(leaves, id);

        // Appending past the tail skips the scan
        let mut insert_after = self.tail.filter(|tail| leaves[*tail].key < leaves[id].key);
        let mut current = if insert_after.is_some() { None } else { self.head };
        while let Some(cur) = current {
            if leaves[cur].key > leaves[id].key {
                break;
            }
            insert_after = Some(cur);
            current = leaves[cur].next;
        }

        let next = match insert_after {
            Some(after) => leaves[after].next,
            None => self.head,
        };
        leaves[id].prev = insert_after;
        leaves[id].next = next;
        match insert_after {
            Some(after) => leaves[after].next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => leaves[next].prev = Some(id),
            None => self.tail = Some(id),
        }
    }

    /// Remove `id` from the list, joining its former neighbors. No-op if unlinked.
    pub(crate) fn unlink(&mut self, leaves: &mut LeafArena, id: LeafId) {
        let (prev, next) = (leaves[id].prev, leaves[id].next);
        if prev.is_none() && next.is_none() && self.head != Some(id) {
            return;
        }
        match prev {
            Some(prev) => leaves[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => leaves[next].prev = prev,
            None => self.tail = prev,
        }
        leaves[id].prev = None;
        leaves[id].next = None;
    }

    /// Leaves bracketing `key`: the largest key below it and the smallest above it
    pub(crate) fn bracket(
        &self,
        leaves: &LeafArena,
        key: &[u8],
    ) -> (Option<LeafId>, Option<LeafId>) {
        let mut lower = None;
        let mut current = self.head;
        while let Some(cur) = current {
            let leaf = &leaves[cur];
            if leaf.key.as_slice() >= key {
                break;
            }
            lower = Some(cur);
            current = leaf.next;
        }
        // Skip an exact match so both bounds are strict
        if let Some(cur) = current.filter(|cur| leaves[*cur].key == key) {
            current = leaves[cur].next;
        }
        (lower, current)
    }

    /// Walk the list from the head
    pub(crate) fn iter<'a>(&self, leaves: &'a LeafArena) -> impl Iterator<Item = &'a Leaf> + 'a {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let leaf = &leaves[current?];
            current = leaf.next;
            Some(leaf)
        })
    }

    #[cfg(test)]
    pub(crate) const fn tail(&self) -> Option<LeafId> {
        self.tail
    }
}
