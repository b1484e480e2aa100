//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve the request path against the live route table
//! - Bind parameter values and build the [`EndpointRequest`]
//! - Buffer the body for endpoints flagged `read_body`
//! - Run the body read and the handler under the endpoint timeout
//! - Count hits and record metrics
//!
//! # Design Decisions
//! - The router snapshot is released before any await point
//! - Only the URI path is routed; the query string is ignored
//! - Failures become responses (`DispatchError: IntoResponse`)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes, HttpBody};
use axum::http::request::Parts;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use thiserror::Error;

use crate::config::DispatchConfig;
use crate::dispatch::registry::HandlerRegistry;
use crate::dispatch::request::{EndpointRequest, PathParams};
use crate::dispatch::stats::{EndpointStats, UNKNOWN_ENDPOINT};
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::routing::{EndpointId, RouteTable, FLAG_READ_BODY, NO_ENDPOINT};

/// Reasons a request could not be served by a handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No matching endpoint")]
    NotFound,

    #[error("No handler registered for endpoint {0}")]
    NoHandler(EndpointId),

    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    BodyRead(axum::Error),

    #[error("Timeout")]
    Timeout { after_ms: u64 },
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NotFound => StatusCode::NOT_FOUND,
            DispatchError::NoHandler(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DispatchError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            DispatchError::BodyRead(_) => StatusCode::BAD_REQUEST,
            DispatchError::Timeout { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Owned result of a route lookup.
struct RouteInfo {
    id: EndpointId,
    pattern: Option<String>,
    params: PathParams,
    read_body: bool,
}

impl RouteInfo {
    fn label(&self) -> &str {
        self.pattern.as_deref().unwrap_or(UNKNOWN_ENDPOINT)
    }
}

/// Routes requests to registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

#[derive(Debug)]
struct DispatcherInner {
    table: RouteTable,
    handlers: HandlerRegistry,
    config: DispatchConfig,
    stats: EndpointStats,
}

impl Dispatcher {
    pub fn new(table: RouteTable, handlers: HandlerRegistry, config: DispatchConfig) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                table,
                handlers,
                config,
                stats: EndpointStats::new(),
            }),
        }
    }

    /// The route table this dispatcher reads; swap routes through it.
    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn stats(&self) -> &EndpointStats {
        &self.inner.stats
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    /// Serve one request.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let (parts, body) = request.into_parts();
        let route = self.lookup(parts.uri.path());

        self.inner.stats.hit(route.label());
        let label = route.label().to_string();

        if self.inner.config.log_requests {
            tracing::info!(
                request_id = %request_id(&parts.headers),
                method = %parts.method,
                path = %parts.uri.path(),
                endpoint = %label,
                id = route.id,
                "Dispatching request"
            );
        }

        let response = match self.serve(route, parts, body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(endpoint = %label, error = %e, "Dispatch failed");
                e.into_response()
            }
        };

        metrics::record_request(&label, response.status().as_u16(), start);
        response
    }

    fn lookup(&self, path: &str) -> RouteInfo {
        let router = self.inner.table.load();
        match router.resolve(path) {
            Some(m) => RouteInfo {
                id: m.id(),
                pattern: Some(m.endpoint().pattern().to_string()),
                params: m.params().collect(),
                read_body: m.endpoint().flag(FLAG_READ_BODY),
            },
            None => {
                metrics::record_route_miss();
                tracing::debug!(path, "No endpoint matched");
                RouteInfo {
                    id: NO_ENDPOINT,
                    pattern: None,
                    params: PathParams::default(),
                    read_body: false,
                }
            }
        }
    }

    async fn serve(&self, route: RouteInfo, parts: Parts, body: Body) -> Result<Response, DispatchError> {
        let handler = match self.inner.handlers.handler_for(route.id) {
            Some(handler) => handler.clone(),
            None if route.id == NO_ENDPOINT => return Err(DispatchError::NotFound),
            None => return Err(DispatchError::NoHandler(route.id)),
        };

        let timeout_ms = self.inner.config.endpoint_timeout_ms;
        let work = async move {
            let body = if route.read_body {
                self.read_body(&parts, body).await?
            } else {
                Bytes::new()
            };

            Ok::<_, DispatchError>(handler
                .call(EndpointRequest {
                    endpoint_id: route.id,
                    pattern: route.pattern,
                    params: route.params,
                    parts,
                    body,
                })
                .await)
        };

        // The timeout covers buffering the body as well as the handler
        match timeout_ms {
            0 => work.await,
            ms => tokio::time::timeout(Duration::from_millis(ms), work)
                .await
                .map_err(|_| DispatchError::Timeout { after_ms: ms })?,
        }
    }

    async fn read_body(&self, parts: &Parts, body: Body) -> Result<Bytes, DispatchError> {
        let limit = self.inner.config.max_request_body_size;

        let declared = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .or_else(|| body.size_hint().exact());
        if declared.is_some_and(|len| len > limit as u64) {
            return Err(DispatchError::BodyTooLarge { limit });
        }

        // Streamed bodies carry no length up front; the limit trips mid-read
        axum::body::to_bytes(body, limit).await.map_err(|e| {
            let inner = e.into_inner();
            if exceeds_limit(&*inner) {
                DispatchError::BodyTooLarge { limit }
            } else {
                DispatchError::BodyRead(axum::Error::new(inner))
            }
        })
    }
}

fn exceeds_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Router;

    fn dispatcher(config: DispatchConfig) -> Dispatcher {
        let mut router = Router::new();
        router.add_endpoint("/users/:id", 1);
        router.add_endpoint("/upload", 2).set_flag(FLAG_READ_BODY, true);
        router.add_endpoint("/orphan", 3);
        router.add_endpoint("/slow", 4);

        let mut handlers = HandlerRegistry::new();
        handlers.register(1, |req: EndpointRequest| async move {
            format!("user {}", req.param("id").unwrap_or("?"))
        });
        handlers.register(2, |req: EndpointRequest| async move { format!("{} bytes", req.body.len()) });
        handlers.register(4, |_req: EndpointRequest| async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            "late"
        });

        Dispatcher::new(RouteTable::new(router), handlers, config)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_binds_params() {
        let d = dispatcher(DispatchConfig::default());
        let response = d.dispatch(get("/users/42?verbose=1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "user 42");
        assert_eq!(d.stats().get("/users/:id"), 1);
    }

    #[tokio::test]
    async fn test_not_found_without_fallback() {
        let d = dispatcher(DispatchConfig::default());
        let response = d.dispatch(get("/missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(d.stats().get(UNKNOWN_ENDPOINT), 1);
    }

    #[tokio::test]
    async fn test_no_handler() {
        let d = dispatcher(DispatchConfig::default());
        let response = d.dispatch(get("/orphan")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "No handler registered for endpoint 3");
    }

    #[tokio::test]
    async fn test_read_body_flag() {
        let d = dispatcher(DispatchConfig::default());
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from("hello"))
            .unwrap();
        assert_eq!(body_text(d.dispatch(request).await).await, "5 bytes");
    }

    #[tokio::test]
    async fn test_body_ignored_without_flag() {
        let d = dispatcher(DispatchConfig::default());
        let request = Request::builder()
            .method("POST")
            .uri("/users/1")
            .body(Body::from("ignored"))
            .unwrap();
        assert_eq!(d.dispatch(request).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let d = dispatcher(DispatchConfig {
            max_request_body_size: 4,
            ..DispatchConfig::default()
        });
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from("too long"))
            .unwrap();
        assert_eq!(d.dispatch(request).await.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_streamed_body_too_large() {
        let d = dispatcher(DispatchConfig {
            max_request_body_size: 4,
            ..DispatchConfig::default()
        });
        let chunks = ["too ", "long"].map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c.as_bytes())));
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap();

        let response = d.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_text(response).await, "Request body exceeds 4 bytes");
    }

    #[tokio::test]
    async fn test_streamed_body_within_limit() {
        let d = dispatcher(DispatchConfig {
            max_request_body_size: 8,
            ..DispatchConfig::default()
        });
        let chunks = ["abc", "def"].map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c.as_bytes())));
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap();

        assert_eq!(body_text(d.dispatch(request).await).await, "6 bytes");
    }

    #[tokio::test]
    async fn test_timeout_covers_body_read() {
        let d = dispatcher(DispatchConfig {
            endpoint_timeout_ms: 20,
            ..DispatchConfig::default()
        });
        // A client that never finishes sending
        let stalled = futures_util::stream::pending::<Result<Bytes, std::io::Error>>();
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from_stream(stalled))
            .unwrap();

        let response = d.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Timeout");
    }

    #[tokio::test]
    async fn test_endpoint_timeout() {
        let d = dispatcher(DispatchConfig {
            endpoint_timeout_ms: 20,
            ..DispatchConfig::default()
        });
        let response = d.dispatch(get("/slow")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Timeout");
    }

    #[tokio::test]
    async fn test_routes_swapped_while_serving() {
        let d = dispatcher(DispatchConfig::default());
        assert_eq!(d.dispatch(get("/users/7")).await.status(), StatusCode::OK);

        d.table().replace(Router::new());
        assert_eq!(d.dispatch(get("/users/7")).await.status(), StatusCode::NOT_FOUND);
    }
}
