//! Endpoint metadata.
//!
//! An [`Endpoint`] is attached to the trie node where a registered pattern
//! terminates. It carries the caller-chosen id, the parameter names declared
//! by the pattern (left to right) and a set of named boolean flags.

use std::collections::HashMap;
use std::iter::FusedIterator;

/// Caller-chosen endpoint identifier.
pub type EndpointId = i32;

/// Returned by id lookups when no endpoint matches.
pub const NO_ENDPOINT: EndpointId = -1;

/// Flag asking the dispatcher to buffer the request body for the handler.
pub const FLAG_READ_BODY: &str = "read_body";

/// Flag reserved for session-aware handlers.
pub const FLAG_INIT_SESSION: &str = "init_session";

/// Metadata for one registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    id: EndpointId,
    pattern: String,
    param_names: Vec<String>,
    flags: HashMap<String, bool>,
}

impl Endpoint {
    pub(crate) fn new(id: EndpointId, pattern: impl Into<String>, param_names: Vec<String>) -> Self {
        Self {
            id,
            pattern: pattern.into(),
            param_names,
            flags: HashMap::new(),
        }
    }

    /// The id assigned at registration.
    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// The pattern text this endpoint was registered with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Read a flag. Names never set read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Set a flag, overwriting any previous value.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Flags that were explicitly set, in no particular order.
    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Parameter names in declaration order.
    ///
    /// Each call returns a fresh iterator; iterators are independent.
    pub fn param_names(&self) -> ParamNames<'_> {
        ParamNames {
            inner: self.param_names.iter(),
        }
    }

    /// Number of parameter segments in the registering pattern.
    pub fn param_count(&self) -> usize {
        self.param_names.len()
    }
}

/// Iterator over an endpoint's parameter names.
#[derive(Debug, Clone)]
pub struct ParamNames<'a> {
    inner: std::slice::Iter<'a, String>,
}

impl<'a> Iterator for ParamNames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for ParamNames<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(String::as_str)
    }
}

impl ExactSizeIterator for ParamNames<'_> {}

impl FusedIterator for ParamNames<'_> {}
