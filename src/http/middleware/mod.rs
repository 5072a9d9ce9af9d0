//! Protective middleware.
//!
//! # Ordering
//! ```text
//! request → cors (outermost) → auth → body_limit → router
//! ```
//! Each guard may answer on its own instead of calling the next one. CORS
//! wraps the other two so their rejections still carry CORS headers.

pub mod auth;
pub mod body_limit;
pub mod cors;

pub use auth::{auth_middleware, AuthGuard};
pub use body_limit::{body_limit_middleware, BodyLimit, BodyTooLarge, LimitedBody};
pub use cors::build_cors_layer;
