//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::MatchOptions;

/// Root configuration for the router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Path matching switches.
    pub router: RouterConfig,

    /// Extra capture rules, registered after the defaults.
    pub rules: Vec<RuleConfig>,

    /// Route definitions.
    pub routes: Vec<RouteConfig>,

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

/// Matching behaviour shared by compile and match time.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Keep literal case in patterns and request paths.
    pub case_sensitive: bool,

    /// Treat `/path/` and `/path` as different paths.
    pub strict_slash: bool,
}

impl From<RouterConfig> for MatchOptions {
    fn from(config: RouterConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
            strict_slash: config.strict_slash,
        }
    }
}

/// A named capture rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Name referenced from patterns as `{name:var}`.
    pub name: String,

    /// Regular expression, implicitly anchored.
    pub expression: String,
}

/// A served route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Name for reverse generation and logs.
    #[serde(default)]
    pub name: Option<String>,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Path pattern.
    pub path: String,

    /// Fixed response body. Without one the route echoes its captures as JSON.
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
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
