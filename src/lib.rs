//! Segment-trie HTTP path router with an async dispatcher.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use dispatch::{Dispatcher, HandlerRegistry};
pub use http::HttpServer;
pub use routing::{Endpoint, RouteTable, Router};
