//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum router: liveness route plus the engine mount
//! - Wire the guards in order (cors → auth → body limit)
//! - Attach request IDs and per-request trace spans
//! - Serve until the shutdown signal fires, then drain

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware,
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tower::Service;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::middleware::{
    auth_middleware, body_limit_middleware, build_cors_layer, AuthGuard, BodyLimit,
};
use crate::lifecycle::ShutdownSignal;
use crate::routing;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a server that forwards `/mcp` traffic to `engine`.
    pub fn new<E>(config: GatewayConfig, engine: E) -> Self
    where
        E: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        E::Response: IntoResponse,
        E::Future: Send + 'static,
    {
        let router = Self::build_router(&config, engine);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Axum runs the last `.layer` call first, so the guards are listed
    /// innermost first.
    pub fn build_router<E>(config: &GatewayConfig, engine: E) -> Router
    where
        E: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        E::Response: IntoResponse,
        E::Future: Send + 'static,
    {
        let body_limit = BodyLimit::new(config.limits.max_body_bytes);
        let auth = AuthGuard::from_config(&config.auth);

        routing::routes(engine)
            .layer(middleware::from_fn_with_state(body_limit, body_limit_middleware))
            .layer(middleware::from_fn_with_state(auth, auth_middleware))
            .layer(build_cors_layer(&config.cors))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router with every layer attached, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth_enabled = self.config.auth.enabled(),
            max_body_bytes = self.config.limits.max_body_bytes,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        body::{Body, Bytes},
        http::{header, Method, StatusCode},
    };
    use futures_util::stream;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    const ORIGIN: &str = "http://localhost:3000";

    /// Engine double: drains the body and counts invocations.
    fn counting_engine(calls: Arc<AtomicUsize>) -> Router {
        Router::new().fallback(move |request: Request| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                match axum::body::to_bytes(request.into_body(), usize::MAX).await {
                    Ok(bytes) => (StatusCode::OK, bytes).into_response(),
                    Err(_) => StatusCode::BAD_REQUEST.into_response(),
                }
            }
        })
    }

    fn config(token: Option<&str>, max_body_bytes: u64) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.auth.token = token.map(String::from);
        config.limits.max_body_bytes = max_body_bytes;
        config
    }

    fn app(config: &GatewayConfig) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = HttpServer::build_router(config, counting_engine(calls.clone()));
        (router, calls)
    }

    fn chunked(chunks: &[&'static str]) -> Body {
        let chunks: Vec<Result<Bytes, std::io::Error>> = chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect();
        Body::from_stream(stream::iter(chunks))
    }

    async fn text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn healthz_is_open_even_with_token() {
        let (router, _) = app(&config(Some("secret"), 10));
        let response = router
            .oneshot(axum::http::Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(text(response).await, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn declared_length_over_ceiling_is_413_without_engine_call() {
        let (router, calls) = app(&config(None, 10));
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/mcp/x")
            .header(header::CONTENT_LENGTH, "20")
            .body(Body::from("x".repeat(20)))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn streamed_body_over_ceiling_is_413() {
        let (router, _) = app(&config(None, 10));
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/mcp/x")
            .body(chunked(&["aaaaa", "bbbbb", "ccccc"]))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            text(response).await,
            r#"{"detail":"Request body too large"}"#
        );
    }

    #[tokio::test]
    async fn body_at_ceiling_reaches_engine_intact() {
        let (router, calls) = app(&config(None, 10));
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/mcp/x")
            .body(chunked(&["01234", "56789"]))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(text(response).await, "0123456789");
    }

    #[tokio::test]
    async fn token_scenarios() {
        let config = config(Some("secret"), 1024);

        let (router, calls) = app(&config);
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/mcp/x")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let (router, calls) = app(&config);
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/mcp/x")
                    .header(header::AUTHORIZATION, "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_token_means_open_access() {
        let (router, calls) = app(&config(None, 1024));
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/mcp/x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejections_carry_cors_headers() {
        let (router, _) = app(&config(Some("secret"), 10));
        let unauthorized = router
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/mcp/x")
                    .header(header::ORIGIN, ORIGIN)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            unauthorized.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            ORIGIN
        );

        let (router, _) = app(&config(Some("secret"), 10));
        let too_large = router
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/mcp/x")
                    .header(header::ORIGIN, ORIGIN)
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .header(header::CONTENT_LENGTH, "20")
                    .body(Body::from("x".repeat(20)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            too_large.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            ORIGIN
        );
    }

    #[tokio::test]
    async fn preflight_needs_no_token() {
        let (router, calls) = app(&config(Some("secret"), 10));
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/mcp/x")
                    .header(header::ORIGIN, ORIGIN)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            ORIGIN
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
