//! Ingress Gate Library
//!
//! An inbound-request sanitizer for HTTP services: every externally
//! controlled field (headers, cookies, query, route params, body) is
//! checked for injection characters before a request reaches the
//! application routes. Offending requests are answered with a uniform
//! 400; everything else passes through unchanged.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sanitize;

pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use sanitize::{CharacterPolicy, RequestGate, RequestView, Verdict};
