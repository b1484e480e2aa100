//! Handler registry.
//!
//! Maps endpoint ids to application handlers. A registry is a plain value
//! handed to the [`Dispatcher`](crate::dispatch::Dispatcher) when it is
//! built, so independent servers never share handlers.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};

use crate::dispatch::request::EndpointRequest;
use crate::routing::EndpointId;

/// Boxed future returned by [`Handler::call`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Application code bound to one or more endpoints.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: EndpointRequest) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(EndpointRequest) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
{
    fn call(&self, request: EndpointRequest) -> HandlerFuture {
        let fut = self(request);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Endpoint id → handler table with an optional fallback.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EndpointId, Arc<dyn Handler>>,
    fallback: Option<Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `id`, replacing any previous binding.
    pub fn register(&mut self, id: EndpointId, handler: impl Handler) -> &mut Self {
        if self.handlers.insert(id, Arc::new(handler)).is_some() {
            tracing::debug!(id, "Handler replaced");
        }
        self
    }

    /// Handler for endpoints without their own binding, and for requests
    /// that matched no endpoint (dispatched with id `-1`).
    pub fn with_fallback(&mut self, handler: impl Handler) -> &mut Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// The handler that serves `id`: its own binding, else the fallback.
    pub fn handler_for(&self, id: EndpointId) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(&id).or(self.fallback.as_ref())
    }

    /// Number of endpoint-specific bindings.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("ids", &ids)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
