//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → dispatcher.rs (resolve path against the live RouteTable)
//!     → request.rs (EndpointRequest: id, pattern, bound params, body)
//!     → registry.rs (handler for the endpoint id, else fallback)
//!     → stats.rs (per-endpoint hit counter)
//!     → handler response, or a DispatchError response
//! ```
//!
//! # Design Decisions
//! - Handlers live in an explicit registry passed at construction
//! - Unmatched requests reach the fallback handler with id `-1`
//! - Parameter values come from the same trie walk that found the endpoint

pub mod dispatcher;
pub mod registry;
pub mod request;
pub mod stats;

pub use dispatcher::{DispatchError, Dispatcher};
pub use registry::{Handler, HandlerFuture, HandlerRegistry};
pub use request::{EndpointRequest, PathParams};
pub use stats::{EndpointStats, UNKNOWN_ENDPOINT};
