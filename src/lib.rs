//! Secure MCP gateway library.
//!
//! An HTTP front-end that mounts a tool-invocation engine under `/mcp` behind
//! three guards: CORS, optional bearer-token auth, and a streaming request
//! body ceiling.

pub mod config;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
