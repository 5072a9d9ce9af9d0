//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → middleware/cors.rs (outermost guard)
//!     → middleware/auth.rs (bearer token)
//!     → middleware/body_limit.rs (declared + streamed size)
//!     → routing (healthz or engine)
//!     → response.rs (JSON rejection bodies)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{header_str, ConnectionKind};
pub use server::HttpServer;
