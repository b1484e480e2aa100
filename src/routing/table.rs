//! Copy-on-write route table.
//!
//! The trie has no internal locking, so a router that is being served is
//! never mutated in place. Updates clone the current tree, modify the clone
//! and publish it with a single atomic pointer swap. Readers holding an
//! earlier `Arc<Router>` keep a consistent view until they drop it.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::router::Router;

/// Shared handle to the live router.
#[derive(Debug, Clone)]
pub struct RouteTable {
    inner: Arc<ArcSwap<Router>>,
}

impl RouteTable {
    pub fn new(router: Router) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(router)),
        }
    }

    /// Snapshot of the current router.
    pub fn load(&self) -> Arc<Router> {
        self.inner.load_full()
    }

    /// Publish a freshly built router.
    pub fn replace(&self, router: Router) {
        let routes = router.len();
        self.inner.store(Arc::new(router));
        tracing::info!(routes, "Route table replaced");
    }

    /// Clone the live router, apply `f`, and publish the result.
    ///
    /// `f` may run more than once if another update races with this one.
    pub fn update<F>(&self, f: F)
    where
        F: Fn(&mut Router),
    {
        self.inner.rcu(|current| {
            let mut next = Router::clone(current);
            f(&mut next);
            next
        });
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(Router::new())
    }
}
