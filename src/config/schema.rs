//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::Endpoint;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Static routes, consulted before discovered services.
    pub routes: Vec<StaticRouteConfig>,

    /// Service discovery settings.
    pub discovery: DiscoveryConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// A static route mapping a server-name pattern to a back-end.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticRouteConfig {
    /// Server-name pattern (`foo.example`, `*.example` or `*`).
    pub pattern: String,

    /// Back-end `host:port`. Absent means "explicitly no route".
    #[serde(default)]
    pub address: Option<String>,

    /// Label used in logs (defaults to the pattern).
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the back-end speaks TLS.
    #[serde(default = "default_true")]
    pub tls: bool,
}

impl StaticRouteConfig {
    /// The endpoint this route maps to, if any.
    pub fn endpoint(&self) -> Option<Endpoint> {
        let address = self.address.as_ref()?;
        Some(Endpoint {
            description: self
                .description
                .clone()
                .unwrap_or_else(|| self.pattern.clone()),
            address: address.clone(),
            tls: self.tls,
        })
    }
}

fn default_true() -> bool {
    true
}

/// Which Docker inventory to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Swarm services (`GET /services`).
    #[default]
    Services,
    /// Plain containers (`GET /containers/json`).
    Containers,
}

/// Service discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Enable dynamic discovery.
    pub enabled: bool,

    /// Inventory to query.
    pub mode: DiscoveryMode,

    /// Docker Engine API base URL.
    pub endpoint: String,

    /// Optional API version path segment (e.g. "v1.41").
    pub api_version: Option<String>,

    /// Interval between polls in seconds.
    pub poll_interval_secs: u64,

    /// Timeout for a single API request in seconds.
    pub request_timeout_secs: u64,

    /// How long startup waits for the first load in seconds.
    pub startup_timeout_secs: u64,

    /// Label mapping rules.
    pub labels: LabelConfig,
}

impl DiscoveryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: DiscoveryMode::default(),
            endpoint: "http://127.0.0.1:2375".to_string(),
            api_version: None,
            poll_interval_secs: 30,
            request_timeout_secs: 10,
            startup_timeout_secs: 10,
            labels: LabelConfig::default(),
        }
    }
}

/// Which service labels carry routing metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Label namespace, e.g. `sni-proxy` reads `sni-proxy.match`.
    pub prefix: String,

    /// Port used when a service has no port label.
    pub default_port: u16,

    /// TLS setting used when a service has no tls label.
    pub default_tls: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            prefix: "sni-proxy".to_string(),
            default_port: 443,
            default_tls: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}
