//! Storage-node service for ATIndex shards
//!
//! Wraps one [`AccTrie`](atindex_acctrie::AccTrie) and exposes the operations the
//! coordinating manager calls over RPC: insert, delete, single-keyword query
//! with proof, prefix query and introspection.

pub mod config;
pub mod node;
pub mod rpc;

pub use config::Config;
pub use node::{NodeStats, QueryResponse, StorageNode};
pub use rpc::{dispatch, RpcRequest, RpcResponse};
