//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (MCP_*, HOST, PORT, RELOAD)
//!     → loader.rs (read & parse, lenient fallbacks)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to the guards and the engine
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated
//! - Every field has a default so an empty environment is a valid setup
//! - Lookup is injectable so tests never touch the real process environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, load_with, parse_bool, parse_csv, ConfigError};
pub use schema::AuthConfig;
pub use schema::CorsConfig;
pub use schema::GatewayConfig;
pub use schema::LimitsConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
