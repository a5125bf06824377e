//! Configuration

use atindex_acctrie::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::env;

/// Storage node configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Storage node identifier
    pub id: String,
    /// Listen address, `host:port`
    pub address: String,
    /// Accumulator digest
    pub hasher: HashAlgorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self { id: "sn0".to_string(), address: "0.0.0.0:50051".to_string(), hasher: HashAlgorithm::Sha256 }
    }
}

impl Config {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            id: lookup("SN_ID").unwrap_or(defaults.id),
            address: lookup("SN_ADDR").unwrap_or(defaults.address),
            hasher: lookup("ACC_HASHER")
                .map(|s| HashAlgorithm::from(s.as_str()))
                .unwrap_or(defaults.hasher),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> =
            [("SN_ID", "sn3"), ("SN_ADDR", "127.0.0.1:7000"), ("ACC_HASHER", "keccak256")].into();
        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.id, "sn3");
        assert_eq!(config.address, "127.0.0.1:7000");
        assert_eq!(config.hasher, HashAlgorithm::Keccak256);
    }
}
