//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for the key-multiplexing proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Routing-key extraction settings.
    pub routing: RoutingConfig,

    /// Route store backing the routing table.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
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

/// Routing-key extraction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Sentinel key naming the global default route in the store.
    pub default_key: String,

    /// Query parameter (and cookie name) carrying the routing key.
    pub query_parameter: String,

    /// Derive a routing key from the Basic-Authorization username.
    pub use_basic_authorization: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_key: "$default".to_string(),
            query_parameter: "backend".to_string(),
            use_basic_authorization: false,
        }
    }
}

/// Route store configuration.
///
/// Exactly one source must be configured: a JSON file on disk, or an
/// inline `routes` table (useful for small fixed deployments and tests).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to a JSON object file mapping routing keys to origin URLs.
    pub path: Option<String>,

    /// Inline routing table, key → origin URL.
    pub routes: HashMap<String, String>,
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
