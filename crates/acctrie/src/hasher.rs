//! Digest helpers for accumulator values

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Keccak};

/// Byte joining accumulator elements. Never valid inside a key or a value.
pub const SEPARATOR: u8 = 0x1f;

/// Digest used to derive accumulator values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// Keccak-256
    Keccak256,
}

impl HashAlgorithm {
    /// Returns the configuration name of the algorithm
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Keccak256 => "keccak256",
        }
    }

    /// Hash a single value
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut state = DigestState::new(*self);
        state.update(data);
        state.finalize()
    }

    /// Hash an ordered element list joined by [`SEPARATOR`]
    pub fn hash_elements<'a, I>(&self, elements: I) -> [u8; 32]
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut state = DigestState::new(*self);
        for (i, element) in elements.into_iter().enumerate() {
            if i > 0 {
                state.update(&[SEPARATOR]);
            }
            state.update(element);
        }
        state.finalize()
    }

    /// Hex-encoded [`Self::hash_elements`]
    pub fn hash_elements_hex<'a, I>(&self, elements: I) -> String
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        hex::encode(self.hash_elements(elements))
    }
}

impl From<&str> for HashAlgorithm {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "keccak" | "keccak256" => Self::Keccak256,
            _ => Self::Sha256,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

enum DigestState {
    Sha256(Sha256),
    Keccak256(Keccak),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Keccak256 => Self::Keccak256(Keccak::v256()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(hasher) => hasher.update(data),
            Self::Keccak256(hasher) => hasher.update(data),
        }
    }

    fn finalize(self) -> [u8; 32] {
        match self {
            Self::Sha256(hasher) => hasher.finalize().into(),
            Self::Keccak256(hasher) => {
                let mut output = [0u8; 32];
                hasher.finalize(&mut output);
                output
            }
        }
    }
}
