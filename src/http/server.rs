//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router forwarding every path to the dispatcher
//! - Wire up middleware (tracing, request ID)
//! - Optionally serve endpoint hit counters
//! - Bind server to listener with graceful shutdown

use std::future::Future;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};

/// HTTP server in front of a [`Dispatcher`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        let router = Self::build_router(&config, dispatcher);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The body limit is not a layer here: only `read_body` endpoints buffer
    /// the body, and the dispatcher enforces the limit for them.
    fn build_router(config: &ServerConfig, dispatcher: Dispatcher) -> Router {
        let mut router = Router::new();
        if let Some(path) = &config.dispatch.stats_path {
            router = router.route(path, get(stats_handler));
        }

        router
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(dispatcher)
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The Axum router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn dispatch_handler(State(dispatcher): State<Dispatcher>, request: Request<Body>) -> Response {
    dispatcher.dispatch(request).await
}

async fn stats_handler(State(dispatcher): State<Dispatcher>) -> impl IntoResponse {
    Json(dispatcher.stats().snapshot())
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
