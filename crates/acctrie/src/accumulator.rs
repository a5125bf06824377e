//! Leaf accumulator: an explicit ordered list of folded elements plus its digest

use crate::hasher::HashAlgorithm;

/// Sentinel folded in place of a missing predecessor.
pub const NO_PREV: &str = "NoPrev";

/// Sentinel folded in place of a missing successor.
pub const NO_NEXT: &str = "NoNext";

/// Hash accumulator over an ordered element list.
///
/// The folded elements are kept alongside the digest so that an element can be
/// removed by re-hashing the list without it. For a leaf the layout is
/// `values ++ [prev_binding, next_binding]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
    algorithm: HashAlgorithm,
    elements: Vec<Vec<u8>>,
    value: String,
}

impl Accumulator {
    /// Create an accumulator with no folded elements
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self::from_elements(algorithm, Vec::new())
    }

    /// Canonical accumulator of a leaf with the given values and neighbor keys
    pub fn for_leaf(
        algorithm: HashAlgorithm,
        values: &[String],
        prev_key: Option<&[u8]>,
        next_key: Option<&[u8]>,
    ) -> Self {
        let mut elements: Vec<Vec<u8>> = values.iter().map(|v| v.as_bytes().to_vec()).collect();
        elements.push(prev_binding(prev_key).to_vec());
        elements.push(next_binding(next_key).to_vec());
        Self::from_elements(algorithm, elements)
    }

    fn from_elements(algorithm: HashAlgorithm, elements: Vec<Vec<u8>>) -> Self {
        let value = algorithm.hash_elements_hex(elements.iter().map(Vec::as_slice));
        Self { algorithm, elements, value }
    }

    /// Hex-encoded digest
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Digest algorithm
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Folded elements in order
    pub fn elements(&self) -> impl Iterator<Item = &[u8]> {
        self.elements.iter().map(Vec::as_slice)
    }

    /// Fold `element` in at the end
    pub fn add(&mut self, element: &[u8]) {
        self.elements.push(element.to_vec());
        self.refresh();
    }

    /// Remove the last occurrence of `element`, returning its slot
    pub fn remove(&mut self, element: &[u8]) -> Option<usize> {
        let slot = self.elements.iter().rposition(|e| e == element)?;
        self.elements.remove(slot);
        self.refresh();
        Some(slot)
    }

    /// Remove `old` and fold `new` into the slot it occupied.
    ///
    /// Returns false, leaving the accumulator untouched, if `old` was never folded.
    pub fn replace(&mut self, old: &[u8], new: &[u8]) -> bool {
        match self.elements.iter().rposition(|e| e == old) {
            Some(slot) => {
                self.elements[slot] = new.to_vec();
                self.refresh();
                true
            }
            None => false,
        }
    }

    fn refresh(&mut self) {
        self.value = self.algorithm.hash_elements_hex(self.elements());
    }
}

/// Element folded for a predecessor: its key or [`NO_PREV`]
pub(crate) fn prev_binding(key: Option<&[u8]>) -> &[u8] {
    key.unwrap_or(NO_PREV.as_bytes())
}

/// Element folded for a successor: its key or [`NO_NEXT`]
pub(crate) fn next_binding(key: Option<&[u8]>) -> &[u8] {
    key.unwrap_or(NO_NEXT.as_bytes())
}
