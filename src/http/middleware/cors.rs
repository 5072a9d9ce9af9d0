//! Cross-origin policy.
//!
//! The layer sits outside the auth and body guards so that their 401/413
//! rejections carry the same `Access-Control-*` headers as successful
//! responses. Without that, a browser reports an opaque CORS failure instead
//! of the real status.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Build a CORS layer from config.
///
/// `*` in `allow_origins` allows any origin. Browsers refuse a literal `*`
/// together with credentials, so in that case the request origin (and the
/// requested headers) are echoed back instead.
pub fn build_cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let has_wildcard_origin = cfg.allow_origins.iter().any(|o| o == "*");

    let mut layer = CorsLayer::new();

    if has_wildcard_origin {
        warn!(
            credentials = cfg.allow_credentials,
            "CORS is configured with allow_origins=['*']; any website may call this server"
        );
        layer = if cfg.allow_credentials {
            layer.allow_origin(AllowOrigin::mirror_request())
        } else {
            layer.allow_origin(Any)
        };
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allow_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        if !origins.is_empty() {
            layer = layer.allow_origin(origins);
        }
    }

    let methods: Vec<Method> = cfg
        .allow_methods
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    layer = if cfg.allow_credentials {
        layer.allow_headers(AllowHeaders::mirror_request())
    } else {
        layer.allow_headers(Any)
    };

    let exposed: Vec<HeaderName> = cfg
        .expose_headers
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();
    if !exposed.is_empty() {
        layer = layer.expose_headers(exposed);
    }

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}
