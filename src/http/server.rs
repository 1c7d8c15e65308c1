//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap an application Router with the sanitizer gate
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind the server to a listener
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GateConfig;
use crate::http::middleware::{sanitize_middleware, SanitizerState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::sanitize::RequestGate;

/// HTTP server for the ingress gate.
///
/// Owns the fully layered router: the supplied application routes sit
/// behind the sanitizer and the supporting middleware stack.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
}

impl HttpServer {
    /// Create a new server gating the given application router.
    pub fn new(config: GateConfig, app: Router) -> Self {
        let gate = Arc::new(RequestGate::new(config.sanitizer.max_body_depth));
        let state = SanitizerState {
            gate,
            enabled: config.sanitizer.enabled,
            max_body_bytes: config.sanitizer.max_body_bytes,
        };

        let router = Self::build_router(&config, state, app);
        Self { router, config }
    }

    /// Layer the middleware stack around the application routes.
    ///
    /// Request ids are stamped before tracing so log lines carry them;
    /// the sanitizer sits innermost, right in front of the handlers.
    fn build_router(config: &GateConfig, state: SanitizerState, app: Router) -> Router {
        app.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                )))
                .layer(DefaultBodyLimit::max(config.sanitizer.max_body_bytes))
                .layer(axum_middleware::from_fn_with_state(
                    state,
                    sanitize_middleware,
                )),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            sanitizer_enabled = self.config.sanitizer.enabled,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
