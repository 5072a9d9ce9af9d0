//! Minimal downstream protocol engine.
//!
//! The gateway treats whatever is mounted under `/mcp` as an opaque
//! `tower::Service`. This module provides the default one: a small JSON-RPC 2.0
//! endpoint that answers `initialize`, `ping`, `tools/list` and `tools/call`
//! for the built-in `add` tool. It does not implement SSE streams or a
//! session store: `GET` and `DELETE` (session termination) are answered with
//! 405, and `Mcp-Session-Id` is issued on `initialize` but never checked.

pub mod tools;

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::schema::SESSION_ID_HEADER;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-06-18";

pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
}

#[derive(Debug)]
struct EngineInfo {
    name: String,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcErrorObject {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Build the engine service, reporting `server_name` on `initialize`.
pub fn service(server_name: impl Into<String>) -> Router {
    let info = Arc::new(EngineInfo {
        name: server_name.into(),
        version: env!("CARGO_PKG_VERSION"),
    });

    Router::new().fallback(handle).with_state(info)
}

async fn handle(State(info): State<Arc<EngineInfo>>, request: Request) -> Response {
    if *request.method() != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "POST")]).into_response();
    }

    // Size is bounded by the gateway's body guard in front of the engine.
    let bytes = match to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    let message: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {err}"),
                )),
            )
                .into_response();
        }
    };

    let rpc = match serde_json::from_value::<JsonRpcRequest>(message) {
        Ok(rpc) if rpc.jsonrpc == JSONRPC_VERSION => rpc,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::INVALID_REQUEST,
                    "Invalid Request",
                )),
            )
                .into_response();
        }
    };

    let Some(id) = rpc.id else {
        tracing::debug!(method = %rpc.method, "Notification accepted");
        return StatusCode::ACCEPTED.into_response();
    };

    tracing::debug!(method = %rpc.method, "Dispatching JSON-RPC request");

    match rpc.method.as_str() {
        "initialize" => {
            let session_id = Uuid::new_v4().to_string();
            let result = json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": { "name": info.name, "version": info.version }
            });
            (
                [(SESSION_ID_HEADER, session_id)],
                Json(JsonRpcResponse::success(id, result)),
            )
                .into_response()
        }
        "ping" => Json(JsonRpcResponse::success(id, json!({}))).into_response(),
        "tools/list" => {
            Json(JsonRpcResponse::success(id, json!({ "tools": tools::list() }))).into_response()
        }
        "tools/call" => match tools::call(rpc.params) {
            Ok(result) => Json(JsonRpcResponse::success(id, result)).into_response(),
            Err(err) => Json(JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                err.to_string(),
            ))
            .into_response(),
        },
        other => Json(JsonRpcResponse::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        ))
        .into_response(),
    }
}
