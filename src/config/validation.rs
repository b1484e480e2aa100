//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, route ids and the stats path
//! - Detect routes that would silently overwrite each other in the trie
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - The router itself still accepts duplicates; only config rejects them

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::segment::{param_name, segments, PARAM_SIGIL};
use crate::routing::EndpointId;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("invalid stats path '{0}'")]
    StatsPath(String),

    #[error("route '{pattern}' has negative id {id}")]
    NegativeId { pattern: String, id: EndpointId },

    #[error("route #{index} has an empty pattern")]
    EmptyPattern { index: usize },

    #[error("route '{pattern}' overwrites '{previous}'")]
    DuplicatePattern { pattern: String, previous: String },

    #[error("endpoint id {id} is used by both '{first}' and '{second}'")]
    DuplicateId { id: EndpointId, first: String, second: String },
}

/// Check a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if let Some(path) = &config.dispatch.stats_path {
        if !is_valid_stats_path(path) {
            errors.push(ValidationError::StatsPath(path.clone()));
        }
    }

    let mut shapes: HashMap<String, &str> = HashMap::new();
    let mut ids: HashMap<EndpointId, &str> = HashMap::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.pattern.trim().is_empty() {
            errors.push(ValidationError::EmptyPattern { index });
            continue;
        }

        if route.id < 0 {
            errors.push(ValidationError::NegativeId {
                pattern: route.pattern.clone(),
                id: route.id,
            });
        }

        if let Some(previous) = shapes.insert(trie_shape(&route.pattern), &route.pattern) {
            errors.push(ValidationError::DuplicatePattern {
                pattern: route.pattern.clone(),
                previous: previous.to_string(),
            });
        }

        if let Some(first) = ids.insert(route.id, &route.pattern) {
            errors.push(ValidationError::DuplicateId {
                id: route.id,
                first: first.to_string(),
                second: route.pattern.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The stats route sits beside the catch-all, so it must be an absolute,
/// non-root, literal path.
fn is_valid_stats_path(path: &str) -> bool {
    path.starts_with('/')
        && segments(path).next().is_some()
        && !path.contains(['{', '}'])
        && segments(path).all(|seg| param_name(seg).is_none())
}

/// Canonical form of a pattern as the trie sees it: empty segments dropped,
/// parameter names erased.
fn trie_shape(pattern: &str) -> String {
    segments(pattern)
        .map(|seg| if param_name(seg).is_some() { PARAM_SIGIL.to_string() } else { seg.to_string() })
        .collect::<Vec<_>>()
        .join("/")
}
