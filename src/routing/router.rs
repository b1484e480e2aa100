//! Route registration and lookup.
//!
//! # Responsibilities
//! - Register patterns into the segment trie
//! - Look up the endpoint for a concrete request path
//! - Bind concrete segment values to the endpoint's parameter names
//!
//! # Design Decisions
//! - Built with `&mut self`, served through `&self` (freeze by sharing)
//! - Last registration of a pattern wins; no duplicate detection here
//! - Greedy lookup: a literal child always beats the parameter child and a
//!   committed branch is never retried. With `/a/b/c` and `/:x/b/d`
//!   registered, `/a/b/d` does not match: the walk commits to `a` and dead
//!   ends at `d`.

use crate::config::RouteConfig;
use crate::routing::endpoint::{Endpoint, EndpointId, NO_ENDPOINT};
use crate::routing::segment::{param_name, segments};
use crate::routing::trie::{Edge, TrieNode};

/// Path router over a segment trie.
#[derive(Debug, Clone, Default)]
pub struct Router {
    root: TrieNode,
}

/// A successful lookup with the parameter values it consumed.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r, 'p> {
    endpoint: &'r Endpoint,
    values: Vec<&'p str>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a router from configured routes, applying their flags.
    pub fn from_routes(routes: &[RouteConfig]) -> Self {
        let mut router = Self::new();
        for route in routes {
            let endpoint = router.add_endpoint(&route.pattern, route.id);
            for (name, value) in &route.flags {
                endpoint.set_flag(name.clone(), *value);
            }
        }
        router
    }

    /// Register `pattern` under `id` and return its endpoint for flag setup.
    ///
    /// Re-registering a pattern that ends on the same trie node replaces the
    /// previous endpoint, flags included.
    pub fn add_endpoint(&mut self, pattern: &str, id: EndpointId) -> &mut Endpoint {
        let mut node = &mut self.root;
        let mut param_names = Vec::new();

        for seg in segments(pattern) {
            node = match param_name(seg) {
                Some(name) => {
                    param_names.push(name.to_owned());
                    node.param_child_mut()
                }
                None => node.literal_child_mut(seg),
            };
        }

        tracing::trace!(pattern, id, params = param_names.len(), "Endpoint registered");
        node.set_endpoint(Endpoint::new(id, pattern, param_names))
    }

    /// Find the endpoint for a concrete path.
    pub fn get_endpoint(&self, path: &str) -> Option<&Endpoint> {
        let mut node = &self.root;
        for seg in segments(path) {
            let (next, _) = node.step(seg)?;
            node = next;
        }
        node.endpoint()
    }

    /// Like [`Router::get_endpoint`], returning [`NO_ENDPOINT`] on a miss.
    pub fn get_endpoint_id(&self, path: &str) -> EndpointId {
        self.get_endpoint(path).map_or(NO_ENDPOINT, Endpoint::id)
    }

    /// Same walk as [`Router::get_endpoint`], also recording the segments
    /// consumed by parameter edges.
    pub fn resolve<'r, 'p>(&'r self, path: &'p str) -> Option<RouteMatch<'r, 'p>> {
        let mut node = &self.root;
        let mut values = Vec::new();
        for seg in segments(path) {
            let (next, edge) = node.step(seg)?;
            if edge == Edge::Param {
                values.push(seg);
            }
            node = next;
        }
        let endpoint = node.endpoint()?;
        Some(RouteMatch { endpoint, values })
    }

    /// All registered endpoints, depth first with literals in key order.
    pub fn endpoints(&self) -> Vec<&Endpoint> {
        let mut out = Vec::new();
        self.root.visit(&mut |ep| out.push(ep));
        out
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.root.visit(&mut |_| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'r, 'p> RouteMatch<'r, 'p> {
    pub fn endpoint(&self) -> &'r Endpoint {
        self.endpoint
    }

    pub fn id(&self) -> EndpointId {
        self.endpoint.id()
    }

    /// `(name, value)` pairs in declaration order.
    pub fn params(&self) -> impl Iterator<Item = (&'r str, &'p str)> + '_ {
        self.endpoint.param_names().zip(self.values.iter().copied())
    }
}
