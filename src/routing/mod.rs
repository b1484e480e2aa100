//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     RouteConfig[] / add_endpoint(pattern, id)
//!     → segment.rs (split on '/', drop empty segments)
//!     → trie.rs (literal child or the node's single parameter child)
//!     → endpoint.rs (id, parameter names, flags on the terminal node)
//!     → table.rs (freeze behind an atomically swappable Arc)
//!
//! Incoming request path:
//!     → router.rs (greedy walk: literal first, parameter second)
//!     → Return: Endpoint (+ bound parameter values) or no match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable while served
//! - Updates after startup are copy-on-write (new tree, atomic swap)
//! - No regex, no backtracking: cost is linear in segment count
//! - A miss is a value (`None` / `-1`), never an error

pub mod endpoint;
pub mod router;
pub mod segment;
pub mod table;
pub mod trie;

pub use endpoint::{Endpoint, EndpointId, ParamNames, FLAG_INIT_SESSION, FLAG_READ_BODY, NO_ENDPOINT};
pub use router::{RouteMatch, Router};
pub use segment::{segment, PARAM_SIGIL};
pub use table::RouteTable;
