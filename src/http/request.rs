//! Request inspection helpers shared by the guards.
//!
//! # Responsibilities
//! - Case-insensitive header lookup that never fails
//! - Classify a request as plain HTTP or a WebSocket handshake
//! - Read the declared `Content-Length`
//!
//! # Design Decisions
//! - Lookups return `""` instead of an error; the guards treat missing and
//!   undecodable values identically
//! - Only plain HTTP requests are inspected by the guards. A request counts as
//!   a WebSocket handshake only when it is a `GET` carrying `Connection:
//!   upgrade`, `Upgrade: websocket` and a `Sec-WebSocket-Key`; anything else
//!   is guarded, whatever upgrade headers it carries

use axum::http::{header, HeaderMap, Method, Request};
use axum::http::header::AsHeaderName;

/// Return the first value of `name` decoded as UTF-8, or `""`.
///
/// Header names are matched case-insensitively. When a header appears more
/// than once, the first occurrence wins.
pub fn header_str<K: AsHeaderName>(headers: &HeaderMap, name: K) -> &str {
    headers
        .get(name)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
        .unwrap_or("")
}

/// Kind of connection a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Ordinary request/response exchange.
    Http,
    /// WebSocket opening handshake.
    Upgrade,
}

impl ConnectionKind {
    /// Classify a request from its method and headers.
    pub fn of<B>(request: &Request<B>) -> Self {
        if *request.method() != Method::GET {
            return ConnectionKind::Http;
        }

        let headers = request.headers();
        let has_token = |name: header::HeaderName, expected: &str| {
            header_str(headers, name)
                .split(',')
                .any(|token| token.trim().eq_ignore_ascii_case(expected))
        };

        if has_token(header::CONNECTION, "upgrade")
            && has_token(header::UPGRADE, "websocket")
            && !header_str(headers, header::SEC_WEBSOCKET_KEY).trim().is_empty()
        {
            ConnectionKind::Upgrade
        } else {
            ConnectionKind::Http
        }
    }

    pub fn is_http(self) -> bool {
        self == ConnectionKind::Http
    }
}

/// Declared body length, if the header parses as an integer.
///
/// Non-numeric values yield `None` and are otherwise ignored. Negative values
/// parse, so they can never exceed a ceiling.
pub fn declared_content_length(headers: &HeaderMap) -> Option<i128> {
    header_str(headers, header::CONTENT_LENGTH).trim().parse().ok()
}
