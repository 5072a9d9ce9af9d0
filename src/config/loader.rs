//! Configuration loading from the process environment.
//!
//! Parsing is lenient where the gateway can fall back to a sane default
//! (a malformed `MCP_MAX_BODY_BYTES` keeps the default ceiling) and strict
//! where it cannot (`PORT` must be a valid port number).

use std::num::ParseIntError;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_SERVER_NAME: &str = "MCP_SERVER_NAME";
pub const ENV_CORS_ALLOW_ORIGINS: &str = "MCP_CORS_ALLOW_ORIGINS";
pub const ENV_CORS_ALLOW_CREDENTIALS: &str = "MCP_CORS_ALLOW_CREDENTIALS";
pub const ENV_MAX_BODY_BYTES: &str = "MCP_MAX_BODY_BYTES";
pub const ENV_AUTH_TOKEN: &str = "MCP_AUTH_TOKEN";
pub const ENV_AUTH_EXEMPT_PATHS: &str = "MCP_AUTH_EXEMPT_PATHS";
pub const ENV_LOG_JSON: &str = "MCP_LOG_JSON";
pub const ENV_METRICS_ADDRESS: &str = "MCP_METRICS_ADDRESS";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_RELOAD: &str = "RELOAD";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} value {value:?}: {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load and validate configuration using `lookup` to resolve variables.
pub fn load_with<F>(lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = GatewayConfig::default();

    if let Some(name) = lookup(ENV_SERVER_NAME) {
        config.server_name = name;
    }

    if let Some(raw) = lookup(ENV_CORS_ALLOW_ORIGINS) {
        config.cors.allow_origins = parse_csv(&raw);
    }
    if let Some(raw) = lookup(ENV_CORS_ALLOW_CREDENTIALS) {
        config.cors.allow_credentials = parse_bool(&raw);
    }

    if let Some(max) = lookup(ENV_MAX_BODY_BYTES).and_then(|raw| raw.trim().parse::<u64>().ok()) {
        config.limits.max_body_bytes = max;
    }

    config.auth.token = lookup(ENV_AUTH_TOKEN).filter(|token| !token.is_empty());
    if let Some(raw) = lookup(ENV_AUTH_EXEMPT_PATHS) {
        config.auth.exempt_paths = parse_csv(&raw);
    }

    if let Some(host) = lookup(ENV_HOST) {
        config.listener.host = host;
    }
    if let Some(raw) = lookup(ENV_PORT) {
        config.listener.port = raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidNumber {
                name: ENV_PORT,
                value: raw.clone(),
                source,
            })?;
    }
    if let Some(raw) = lookup(ENV_RELOAD) {
        config.listener.reload = parse_bool(&raw);
    }

    if let Some(raw) = lookup(ENV_LOG_JSON) {
        config.observability.log_json = parse_bool(&raw);
    }
    config.observability.metrics_address = lookup(ENV_METRICS_ADDRESS)
        .map(|addr| addr.trim().to_string())
        .filter(|addr| !addr.is_empty());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a boolean-ish value: `1, true, yes, y, on` (any case) are true.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
