//! Request body size enforcement.
//!
//! The guard rejects a request in two places:
//! - up front, when `Content-Length` declares more than the ceiling;
//! - mid-stream, when the bytes actually received cross the ceiling, whatever
//!   the client declared.
//!
//! The body is never buffered here. [`LimitedBody`] forwards each frame as it
//! arrives and only keeps a running count, so the guard holds at most one
//! chunk at a time.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    middleware::Next,
    response::Response,
    BoxError,
};
use http_body::{Frame, SizeHint};
use pin_project_lite::pin_project;

use crate::http::request::{declared_content_length, ConnectionKind};
use crate::http::response;
use crate::observability::metrics;

/// Raised by [`LimitedBody`] once the running total crosses the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request body exceeded {limit} bytes ({received} received)")]
pub struct BodyTooLarge {
    pub limit: u64,
    pub received: u64,
}

pin_project! {
    /// Body decorator that counts bytes and fails past `limit`.
    ///
    /// When the limit is crossed the shared `exceeded` flag is raised and the
    /// reader gets [`BodyTooLarge`]. Every later poll repeats the error.
    pub struct LimitedBody<B> {
        #[pin]
        inner: B,
        limit: u64,
        received: u64,
        exceeded: Arc<AtomicBool>,
    }
}

impl<B> LimitedBody<B> {
    pub fn new(inner: B, limit: u64, exceeded: Arc<AtomicBool>) -> Self {
        Self {
            inner,
            limit,
            received: 0,
            exceeded,
        }
    }

    /// Bytes seen so far.
    pub fn received(&self) -> u64 {
        self.received
    }
}

impl<B> http_body::Body for LimitedBody<B>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.project();

        if *this.received > *this.limit {
            return Poll::Ready(Some(Err(Box::new(BodyTooLarge {
                limit: *this.limit,
                received: *this.received,
            }))));
        }

        match ready!(this.inner.poll_frame(cx)) {
            Some(Ok(frame)) => {
                if let Some(data) = frame.data_ref() {
                    *this.received += data.len() as u64;
                    if *this.received > *this.limit {
                        this.exceeded.store(true, Ordering::Release);
                        return Poll::Ready(Some(Err(Box::new(BodyTooLarge {
                            limit: *this.limit,
                            received: *this.received,
                        }))));
                    }
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Some(Err(err)) => Poll::Ready(Some(Err(err.into()))),
            None => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        self.received <= self.limit && self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Middleware state: the body ceiling in bytes.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit {
    max_bytes: u64,
}

impl BodyLimit {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

/// Axum middleware enforcing [`BodyLimit`].
pub async fn body_limit_middleware(
    State(limit): State<BodyLimit>,
    request: Request,
    next: Next,
) -> Response {
    if !ConnectionKind::of(&request).is_http() {
        return next.run(request).await;
    }

    if let Some(declared) = declared_content_length(request.headers()) {
        if declared > i128::from(limit.max_bytes) {
            tracing::warn!(
                path = %request.uri().path(),
                declared = %declared,
                limit = limit.max_bytes,
                "Rejecting request: declared body too large"
            );
            metrics::record_rejection(metrics::REASON_BODY_TOO_LARGE);
            return response::body_too_large();
        }
    }

    let exceeded = Arc::new(AtomicBool::new(false));
    let path = request.uri().path().to_owned();
    let request = request.map(|body| {
        Body::new(LimitedBody::new(body, limit.max_bytes, Arc::clone(&exceeded)))
    });

    let response = next.run(request).await;

    if exceeded.load(Ordering::Acquire) {
        tracing::warn!(
            path = %path,
            limit = limit.max_bytes,
            "Rejecting request: streamed body exceeded limit"
        );
        metrics::record_rejection(metrics::REASON_BODY_TOO_LARGE);
        return response::body_too_large();
    }

    metrics::record_forwarded();
    response
}
