//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! guards, server, engine
//!     → logging.rs (structured tracing events, optional JSON output)
//!     → metrics.rs (rejection counters, optional Prometheus listener)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured filter
//! - Metrics macros are no-ops until a recorder is installed, so library
//!   code records unconditionally

pub mod logging;
pub mod metrics;
