//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::routing::EndpointId;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request dispatch settings.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions, registered in order.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// One route: a pattern, the endpoint id it maps to and its flags.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern, `:name` segments are parameters.
    pub pattern: String,

    /// Endpoint id handed to the handler registry.
    pub id: EndpointId,

    /// Named boolean flags (e.g. `read_body`).
    #[serde(default)]
    pub flags: HashMap<String, bool>,
}

/// Request dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Log every dispatched request at info level.
    pub log_requests: bool,

    /// Handler timeout in milliseconds (0 = none).
    pub endpoint_timeout_ms: u64,

    /// Maximum buffered request body in bytes (endpoints with `read_body`).
    pub max_request_body_size: usize,

    /// Path serving endpoint hit counters as JSON, if set.
    pub stats_path: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            log_requests: true,
            endpoint_timeout_ms: 0,
            max_request_body_size: 2 * 1024 * 1024, // 2MB
            stats_path: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
