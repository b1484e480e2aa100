//! ice-router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request   ┌─────────┐    ┌────────────┐    ┌──────────────┐
//!     ────────────────▶│  http   │───▶│  dispatch  │───▶│   routing    │
//!                      │ server  │    │ dispatcher │    │ trie lookup  │
//!                      └─────────┘    └─────┬──────┘    └──────────────┘
//!                                           │ endpoint id + params
//!                                           ▼
//!     Client Response  ┌─────────┐    ┌────────────┐
//!     ◀────────────────│  http   │◀───│  handler   │
//!                      └─────────┘    │  registry  │
//!                                     └────────────┘
//!
//!     config (TOML) ──▶ Router::from_routes ──▶ RouteTable (atomic swap on reload)
//! ```
//!
//! Application handlers are external to this binary. Every endpoint is
//! served by a fallback that reports what matched, which makes the binary
//! useful for checking a route file against real traffic.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use clap::Parser;
use tokio::net::TcpListener;

use ice_router::config::watcher::{apply_route_updates, ConfigWatcher};
use ice_router::config::{load_config, ServerConfig};
use ice_router::dispatch::{Dispatcher, EndpointRequest, HandlerRegistry};
use ice_router::http::server::shutdown_signal;
use ice_router::http::HttpServer;
use ice_router::observability::{logging, metrics};
use ice_router::routing::{RouteTable, Router};

#[derive(Parser)]
#[command(name = "ice-router")]
#[command(about = "Serve a route table over HTTP", long_about = None)]
struct Args {
    /// Route and server configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routes when the config file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("ice-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        endpoint_timeout_ms = config.dispatch.endpoint_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = Router::from_routes(&config.routes);
    for endpoint in router.endpoints() {
        tracing::debug!(id = endpoint.id(), pattern = endpoint.pattern(), "Route");
    }
    metrics::record_route_count(router.len());
    let table = RouteTable::new(router);

    // Keep the watcher alive for the lifetime of the server
    let _watcher = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let watcher = watcher.run()?;
            tokio::spawn(apply_route_updates(table.clone(), updates));
            Some(watcher)
        }
        _ => None,
    };

    let mut handlers = HandlerRegistry::new();
    handlers.with_fallback(describe_match);

    let dispatcher = Dispatcher::new(table, handlers, config.dispatch.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, dispatcher);
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Report the matched endpoint and its bound parameters as JSON.
async fn describe_match(req: EndpointRequest) -> impl IntoResponse {
    let status = if req.is_matched() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    let body = serde_json::json!({
        "endpoint": req.endpoint_id,
        "pattern": req.pattern,
        "params": req.params,
        "method": req.parts.method.as_str(),
        "path": req.parts.uri.path(),
    });
    (status, Json(body))
}
