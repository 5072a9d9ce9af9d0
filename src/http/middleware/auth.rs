//! Optional static bearer-token authentication.
//!
//! When no token is configured the guard lets everything through. Otherwise
//! `Authorization` must be exactly `Bearer <token>`, except for preflight
//! requests, WebSocket handshakes and the exempt paths.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};

use crate::config::AuthConfig;
use crate::http::request::{header_str, ConnectionKind};
use crate::http::response;
use crate::observability::metrics;

/// Middleware state for [`auth_middleware`].
#[derive(Clone)]
pub struct AuthGuard {
    /// Full expected header value, `Bearer <token>`. `None` disables the guard.
    expected: Option<Arc<str>>,
    exempt_paths: Arc<HashSet<String>>,
}

impl AuthGuard {
    pub fn from_config(config: &AuthConfig) -> Self {
        let expected = config
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| Arc::from(format!("Bearer {token}")));

        Self {
            expected,
            exempt_paths: Arc::new(config.exempt_paths.iter().cloned().collect()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.expected.is_some()
    }

    /// Whether `request` may proceed downstream.
    pub fn permits<B>(&self, request: &Request<B>) -> bool {
        let Some(expected) = self.expected.as_deref() else {
            return true;
        };

        if !ConnectionKind::of(request).is_http()
            || *request.method() == Method::OPTIONS
            || self.exempt_paths.contains(request.uri().path())
        {
            return true;
        }

        let presented = header_str(request.headers(), header::AUTHORIZATION);
        constant_time_eq(presented.as_bytes(), expected.as_bytes())
    }
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard")
            .field("enabled", &self.is_enabled())
            .field("exempt_paths", &self.exempt_paths)
            .finish()
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Axum middleware enforcing [`AuthGuard`].
pub async fn auth_middleware(
    State(guard): State<AuthGuard>,
    request: Request,
    next: Next,
) -> Response {
    if guard.permits(&request) {
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "Rejecting request: missing or invalid bearer token"
    );
    metrics::record_rejection(metrics::REASON_UNAUTHORIZED);
    response::unauthorized()
}
