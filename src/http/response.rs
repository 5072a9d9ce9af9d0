//! Rejection responses produced by the guards.
//!
//! Every rejection is a complete JSON document of the form
//! `{"detail": "..."}` with `Content-Type: application/json`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const BODY_TOO_LARGE_DETAIL: &str = "Request body too large";
pub const UNAUTHORIZED_DETAIL: &str = "Unauthorized";

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

/// Build a `{"detail": ...}` JSON response with the given status.
pub fn json_error(status: StatusCode, detail: &str) -> Response {
    (status, Json(ErrorBody { detail })).into_response()
}

/// 413 Payload Too Large.
pub fn body_too_large() -> Response {
    json_error(StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE_DETAIL)
}

/// 401 Unauthorized.
pub fn unauthorized() -> Response {
    json_error(StatusCode::UNAUTHORIZED, UNAUTHORIZED_DETAIL)
}
