//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (stamp request ID)
//!     → middleware.rs (project request → RequestView, gate verdict)
//!     → application routes (only for accepted requests)
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{sanitize_middleware, SanitizerState};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
