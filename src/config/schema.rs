//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so a loaded config can be dumped for
//! diagnostics; the auth token is never serialized.

use serde::{Deserialize, Serialize};

/// Default server name reported by the engine.
pub const DEFAULT_SERVER_NAME: &str = "mcp-secure-python-starter";

/// Default request body ceiling (256 KiB).
pub const DEFAULT_MAX_BODY_BYTES: u64 = 256 * 1024;

/// Response header exposed to browser scripts so they can read the session id.
pub const SESSION_ID_HEADER: &str = "Mcp-Session-Id";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Name reported by the downstream engine on `initialize`.
    pub server_name: String,

    /// Bind address and process toggles.
    pub listener: ListenerConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Optional bearer-token authentication.
    pub auth: AuthConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            listener: ListenerConfig::default(),
            cors: CorsConfig::default(),
            auth: AuthConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "127.0.0.1").
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Auto-reload toggle. Accepted for compatibility; has no effect.
    pub reload: bool,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            reload: false,
        }
    }
}

/// Cross-origin resource sharing policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the gateway from a browser. `*` means any.
    pub allow_origins: Vec<String>,

    /// Whether `Access-Control-Allow-Credentials: true` is sent.
    pub allow_credentials: bool,

    /// Allowed request methods.
    pub allow_methods: Vec<String>,

    /// Response headers readable by browser scripts.
    pub expose_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            allow_credentials: false,
            allow_methods: vec!["GET".to_string(), "POST".to_string(), "DELETE".to_string()],
            expose_headers: vec![SESSION_ID_HEADER.to_string()],
        }
    }
}

/// Bearer-token authentication.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret. `None` disables authentication entirely.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Paths that never require a token (exact match).
    pub exempt_paths: Vec<String>,
}

impl AuthConfig {
    /// Whether the auth guard will enforce anything.
    pub fn enabled(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            exempt_paths: vec!["/healthz".to_string()],
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("exempt_paths", &self.exempt_paths)
            .finish()
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes (the ceiling).
    pub max_body_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Fallback filter when `RUST_LOG` is not set.
    pub log_filter: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,

    /// Prometheus listener address; metrics export is off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "mcp_secure_gateway=info,tower_http=info".to_string(),
            log_json: false,
            metrics_address: None,
        }
    }
}
