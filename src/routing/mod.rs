//! Request routing.
//!
//! # Routes
//! ```text
//! GET  /healthz      → liveness, {"ok": true}
//! ANY  /mcp, /mcp/*  → downstream protocol engine (prefix stripped)
//! ```
//!
//! The engine is any `tower::Service`; it owns its own routing, streaming
//! semantics and session handling below the mount point.

use std::convert::Infallible;

use axum::{
    extract::Request,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::Service;

pub const HEALTH_PATH: &str = "/healthz";
pub const ENGINE_MOUNT: &str = "/mcp";

/// Build the route table with `engine` mounted under [`ENGINE_MOUNT`].
pub fn routes<E>(engine: E) -> Router
where
    E: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    E::Response: IntoResponse,
    E::Future: Send + 'static,
{
    Router::new()
        .route(HEALTH_PATH, get(healthz))
        .nest_service(ENGINE_MOUNT, engine)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}
