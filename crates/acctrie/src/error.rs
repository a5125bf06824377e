//! Errors raised by the index structure

use thiserror::Error;

/// Result alias for index operations.
pub type Result<T, E = AccTrieError> = std::result::Result<T, E>;

/// Rejections raised before any mutation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccTrieError {
    /// Key is empty, contains the separator byte, or is a reserved sentinel.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// Lossy UTF-8 rendering of the rejected key.
        key: String,
        /// Why the key was rejected.
        reason: &'static str,
    },
    /// Value contains the separator byte.
    #[error("invalid value {value:?}: contains the reserved separator byte")]
    InvalidValue {
        /// The rejected value.
        value: String,
    },
}

impl AccTrieError {
    pub(crate) fn invalid_key(key: &[u8], reason: &'static str) -> Self {
        Self::InvalidKey { key: String::from_utf8_lossy(key).into_owned(), reason }
    }
}
