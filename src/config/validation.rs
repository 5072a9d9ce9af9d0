//! Configuration validation.
//!
//! Returns every problem found rather than stopping at the first one, so a
//! misconfigured deployment can be fixed in a single pass.

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("max_body_bytes must be greater than 0")]
    ZeroBodyLimit,

    #[error("CORS origin {0:?} is not a valid header value")]
    InvalidOrigin(String),

    #[error("CORS method {0:?} is not a valid HTTP method")]
    InvalidMethod(String),

    #[error("CORS expose header {0:?} is not a valid header name")]
    InvalidExposeHeader(String),

    #[error("auth exempt path {0:?} must start with '/'")]
    InvalidExemptPath(String),

    #[error("metrics address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check semantic constraints serde cannot express.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    for origin in &config.cors.allow_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    for method in &config.cors.allow_methods {
        if method.parse::<Method>().is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }

    for header in &config.cors.expose_headers {
        if header.parse::<HeaderName>().is_err() {
            errors.push(ValidationError::InvalidExposeHeader(header.clone()));
        }
    }

    for path in &config.auth.exempt_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidExemptPath(path.clone()));
        }
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = GatewayConfig::default();
        config.limits.max_body_bytes = 0;
        config.cors.allow_origins.push("http://bad\norigin".to_string());
        config.cors.allow_methods.push("GE T".to_string());
        config.auth.exempt_paths.push("healthz".to_string());
        config.observability.metrics_address = Some("not-an-addr".to_string());

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroBodyLimit,
                ValidationError::InvalidOrigin("http://bad\norigin".to_string()),
                ValidationError::InvalidMethod("GE T".to_string()),
                ValidationError::InvalidExemptPath("healthz".to_string()),
                ValidationError::InvalidMetricsAddress("not-an-addr".to_string()),
            ]
        );
    }
}
