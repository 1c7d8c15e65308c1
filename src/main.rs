//! Ingress Gate
//!
//! Standalone sanitizer service: a small demo application served behind
//! the gate. Hostile requests never reach the handlers.

use std::path::PathBuf;

use axum::{
    extract::Path,
    http::Method,
    routing::{any, get},
    Json, Router,
};
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;

use ingress_gate::config::{load_config, GateConfig};
use ingress_gate::lifecycle::{signals, Shutdown};
use ingress_gate::observability;
use ingress_gate::HttpServer;

#[derive(Parser)]
#[command(name = "ingress-gate")]
#[command(about = "Inbound-request sanitizer service", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        sanitizer_enabled = config.sanitizer.enabled,
        max_body_depth = config.sanitizer.max_body_depth,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, demo_app());
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Minimal application served behind the gate.
fn demo_app() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", any(echo_root))
        .route("/{*path}", any(echo_path))
}

async fn echo_root(method: Method) -> Json<serde_json::Value> {
    Json(json!({ "method": method.as_str(), "path": "/" }))
}

async fn echo_path(method: Method, Path(path): Path<String>) -> Json<serde_json::Value> {
    Json(json!({ "method": method.as_str(), "path": path }))
}
