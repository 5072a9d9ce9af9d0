//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{extract::Request, http::StatusCode, response::IntoResponse, Json, Router};
use http_body_util::BodyExt;
use mcp_secure_gateway::{GatewayConfig, HttpServer, Shutdown};
use serde_json::json;
use tokio::net::TcpListener;

/// A gateway running on an ephemeral port. Stops when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub engine_calls: Arc<AtomicUsize>,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn engine_calls(&self) -> usize {
        self.engine_calls.load(Ordering::SeqCst)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Engine double that reads the body frame by frame and reports what it saw:
/// `{"bytes": n, "chunks": k, "body": "..."}`.
pub fn recording_engine(calls: Arc<AtomicUsize>) -> Router {
    Router::new().fallback(move |request: Request| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let mut body = request.into_body();
            let mut collected = Vec::new();
            let mut chunks = 0usize;
            while let Some(frame) = body.frame().await {
                match frame {
                    Ok(frame) => {
                        if let Ok(data) = frame.into_data() {
                            chunks += 1;
                            collected.extend_from_slice(&data);
                        }
                    }
                    Err(_) => return StatusCode::BAD_REQUEST.into_response(),
                }
            }
            Json(json!({
                "bytes": collected.len(),
                "chunks": chunks,
                "body": String::from_utf8_lossy(&collected),
            }))
            .into_response()
        }
    })
}

/// Start a gateway with the recording engine mounted under `/mcp`.
pub async fn spawn_gateway(config: GatewayConfig) -> TestGateway {
    let calls = Arc::new(AtomicUsize::new(0));
    let (addr, shutdown) = spawn_with_engine(config, recording_engine(calls.clone())).await;
    TestGateway {
        addr,
        engine_calls: calls,
        shutdown,
    }
}

/// Start a gateway in front of an arbitrary engine.
pub async fn spawn_with_engine(config: GatewayConfig, engine: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let server = HttpServer::new(config, engine);
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn config(token: Option<&str>, max_body_bytes: u64) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.auth.token = token.map(String::from);
    config.limits.max_body_bytes = max_body_bytes;
    config
}
