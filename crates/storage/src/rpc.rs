//! JSON-RPC dispatch for the storage node

use atindex_acctrie::AccTrieError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::node::StorageNode;

/// Method not found
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid params
pub const INVALID_PARAMS: i64 = -32602;
/// Rejected by the index
pub const INDEX_ERROR: i64 = -32000;

/// JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// Protocol version, echoed back as `2.0`
    #[serde(default)]
    pub jsonrpc: String,
    /// Method name
    pub method: String,
    /// Positional parameters
    #[serde(default)]
    pub params: Option<Value>,
    /// Request id
    #[serde(default)]
    pub id: Value,
}

/// JSON-RPC error object
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RpcError {
    /// Error code
    pub code: i64,
    /// Human readable message
    pub message: String,
}

/// JSON-RPC response
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// Always `2.0`
    pub jsonrpc: String,
    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// Request id
    pub id: Value,
}

/// Key/value parameters of insert and delete
#[derive(Debug, Deserialize)]
struct KvParams {
    key: String,
    #[serde(default)]
    values: Vec<String>,
}

/// Execute one request against `node`
pub fn dispatch(node: &StorageNode, req: RpcRequest) -> RpcResponse {
    let outcome = match req.method.as_str() {
        "sn_insertKV" => first_param::<KvParams>(&req)
            .and_then(|p| to_value(node.insert_kv(&p.key, p.values).map_err(index_error)?)),
        "sn_deleteKV" => first_param::<KvParams>(&req)
            .and_then(|p| to_value(node.delete_kv(&p.key, p.values).map_err(index_error)?)),
        "sn_singleKeywordQuery" => {
            first_param::<String>(&req).and_then(|key| to_value(node.single_keyword_query(&key)))
        }
        "sn_prefixQuery" => {
            first_param::<String>(&req).and_then(|prefix| to_value(node.prefix_query(&prefix)))
        }
        "sn_listLeaves" => to_value(node.all_leaves()),
        "sn_stats" => to_value(node.stats()),
        method => Err(RpcError { code: METHOD_NOT_FOUND, message: format!("unknown method: {method}") }),
    };

    let (result, error) = match outcome {
        Ok(result) => (Some(result), None),
        Err(error) => {
            warn!(target: "storage_rpc", method = %req.method, code = error.code, message = %error.message, "request failed");
            (None, Some(error))
        }
    };
    RpcResponse { jsonrpc: "2.0".to_string(), result, error, id: req.id }
}

fn first_param<T: for<'de> Deserialize<'de>>(req: &RpcRequest) -> Result<T, RpcError> {
    let param = req
        .params
        .as_ref()
        .and_then(|p| p.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| RpcError { code: INVALID_PARAMS, message: "no params".to_string() })?;
    serde_json::from_value(param.clone())
        .map_err(|e| RpcError { code: INVALID_PARAMS, message: format!("invalid params: {e}") })
}

fn to_value<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError { code: INDEX_ERROR, message: format!("serialization failed: {e}") })
}

fn index_error(e: AccTrieError) -> RpcError {
    RpcError { code: INDEX_ERROR, message: e.to_string() }
}
