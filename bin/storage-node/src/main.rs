//! ATIndex storage node
//!
//! Serves one accumulator-chained trie shard:
//! - JSON-RPC on `POST /` (`sn_insertKV`, `sn_deleteKV`, `sn_singleKeywordQuery`, ...)
//! - Health check on `GET /` and `GET /health`
//!
//! Configured through `SN_ID`, `SN_ADDR` and `ACC_HASHER`.

use std::sync::Arc;

use anyhow::{Context, Result};
use atindex_storage::{dispatch, Config, RpcRequest, RpcResponse, StorageNode};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

type SharedNode = Arc<StorageNode>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let node = Arc::new(StorageNode::new(&config));
    info!("Starting ATIndex storage node {}...", node.id());
    info!("  Accumulator hasher: {}", config.hasher);

    let addr = node.address().to_owned();

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/", post(rpc_handler))
        .with_state(node);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to listen on {addr}"))?;
    info!("RPC server listening on {}", addr);
    axum::serve(listener, app).await.context("RPC server failed")?;
    Ok(())
}

/// Health check endpoint
async fn health() -> &'static str {
    "ok"
}

/// RPC handler
async fn rpc_handler(State(node): State<SharedNode>, Json(req): Json<RpcRequest>) -> Json<RpcResponse> {
    Json(dispatch(&node, req))
}
