//! Membership and non-membership proofs
//!
//! A proof carries full [`LeafView`]s. Verification recomputes each leaf
//! accumulator from its values and neighbor bindings and checks that the
//! bindings chain the way the order list would. The accumulators themselves
//! must still be matched against values the verifier trusts, e.g. the ones
//! reported by earlier [`InsertResult`](crate::InsertResult)s.

use serde::{Deserialize, Serialize};

use crate::accumulator::Accumulator;
use crate::hasher::HashAlgorithm;
use crate::types::LeafView;

/// Answer to a single-key query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QueryProof {
    /// The key is stored; the leaf is attached
    Membership {
        /// Leaf holding the key
        leaf: LeafView,
    },
    /// The key is absent; the leaves that would bracket it are attached
    NonMembership {
        /// Queried key
        #[serde(with = "hex")]
        key: Vec<u8>,
        /// Largest stored key below the queried key
        lower: Option<LeafView>,
        /// Smallest stored key above the queried key
        upper: Option<LeafView>,
    },
}

impl QueryProof {
    /// Check the proof answers a query for `key`
    pub fn verify(&self, algorithm: HashAlgorithm, key: &[u8]) -> bool {
        match self {
            Self::Membership { leaf } => leaf.key == key && leaf.verify(algorithm),
            Self::NonMembership { key: proved, lower, upper } => {
                if proved != key {
                    return false;
                }
                let lower_key = lower.as_ref().map(|l| l.key.as_slice());
                let upper_key = upper.as_ref().map(|u| u.key.as_slice());
                if let Some(lower) = lower {
                    if !(lower.key.as_slice() < key
                        && lower.next_key.as_deref() == upper_key
                        && lower.verify(algorithm))
                    {
                        return false;
                    }
                }
                if let Some(upper) = upper {
                    if !(upper.key.as_slice() > key
                        && upper.prev_key.as_deref() == lower_key
                        && upper.verify(algorithm))
                    {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Values of the queried key, if it is stored
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Self::Membership { leaf } => Some(&leaf.values),
            Self::NonMembership { .. } => None,
        }
    }

}

impl LeafView {
    /// Recompute the accumulator from values and neighbor bindings
    pub fn compute_accumulator(&self, algorithm: HashAlgorithm) -> String {
        Accumulator::for_leaf(
            algorithm,
            &self.values,
            self.prev_key.as_deref(),
            self.next_key.as_deref(),
        )
        .value()
        .to_owned()
    }

    /// Whether the stated accumulator matches the recomputed one
    pub fn verify(&self, algorithm: HashAlgorithm) -> bool {
        self.compute_accumulator(algorithm) == self.accumulator
    }
}
