//! What a handler receives.

use axum::body::Bytes;
use axum::http::request::Parts;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::routing::{EndpointId, NO_ENDPOINT};

/// Parameter values bound to their declared names, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    pairs: Vec<(String, String)>,
}

impl PathParams {
    /// Value of the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<'a, 'b> FromIterator<(&'a str, &'b str)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'b str)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Serialize for PathParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A request routed to an endpoint.
#[derive(Debug)]
pub struct EndpointRequest {
    /// Matched endpoint id, `-1` when nothing matched.
    pub endpoint_id: EndpointId,

    /// Pattern of the matched endpoint.
    pub pattern: Option<String>,

    /// Bound path parameters.
    pub params: PathParams,

    /// Method, URI, headers and extensions of the original request.
    pub parts: Parts,

    /// Buffered body; empty unless the endpoint sets `read_body`.
    pub body: Bytes,
}

impl EndpointRequest {
    pub fn is_matched(&self) -> bool {
        self.endpoint_id != NO_ENDPOINT
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}
