//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{Request, Response};
use ice_router::config::{parse_config, ServerConfig};
use ice_router::dispatch::{Dispatcher, EndpointRequest, HandlerRegistry};
use ice_router::http::HttpServer;
use ice_router::routing::{RouteTable, Router};

/// Route file used across tests.
pub const ROUTES: &str = r#"
[dispatch]
log_requests = false
max_request_body_size = 64
stats_path = "/_stats"

[[routes]]
pattern = "/users/me"
id = 2

[[routes]]
pattern = "/users/:id"
id = 1

[[routes]]
pattern = "/users/:id/posts/:post"
id = 3

[[routes]]
pattern = "/echo"
id = 4
flags = { read_body = true }
"#;

pub fn config() -> ServerConfig {
    parse_config(ROUTES).unwrap()
}

/// Build a server whose handlers answer `"<id>:<param>=<value>,..."`.
pub fn server(config: ServerConfig) -> HttpServer {
    let table = RouteTable::new(Router::from_routes(&config.routes));

    let mut handlers = HandlerRegistry::new();
    handlers.register(4, |req: EndpointRequest| async move { req.body });
    handlers.with_fallback(|req: EndpointRequest| async move {
        let params: Vec<String> = req.params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}:{}", req.endpoint_id, params.join(","))
    });

    let dispatcher = Dispatcher::new(table, handlers, config.dispatch.clone());
    HttpServer::new(config, dispatcher)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
