//! Service loading: inventory query plus label mapping.
//!
//! # Responsibilities
//! - Query the service source once per call
//! - Map each record's labels to a routable `ServiceInfo`
//! - Skip records that are not routable, without failing the load
//!
//! # Labels (with the default `sni-proxy` prefix)
//! - `sni-proxy.match`: server-name pattern (required)
//! - `sni-proxy.port`: back-end port (default from the schema)
//! - `sni-proxy.address`: full `host:port`, overrides name and port
//! - `sni-proxy.tls`: whether the back-end speaks TLS
//! - `sni-proxy.description`: label for logs (default: service name)

use std::cmp::Ordering;
use std::sync::Arc;

use crate::backend::Endpoint;
use crate::config::LabelConfig;
use crate::discovery::source::{DiscoveryError, ServiceRecord, ServiceSource};
use crate::name::Matcher;

/// A discovered, routable service.
///
/// Equality is structural: name, pattern and endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceInfo {
    pub name: String,
    pub matcher: Matcher,
    pub endpoint: Arc<Endpoint>,
}

impl ServiceInfo {
    pub fn new(name: impl Into<String>, matcher: Matcher, endpoint: Endpoint) -> Self {
        Self {
            name: name.into(),
            matcher,
            endpoint: Arc::new(endpoint),
        }
    }

    /// Total order used for snapshots and change reports: most specific
    /// pattern first, then by service name.
    pub fn precedence(&self, other: &Self) -> Ordering {
        self.matcher
            .specificity()
            .cmp(&other.matcher.specificity())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.matcher.pattern().cmp(other.matcher.pattern()))
            .then_with(|| self.endpoint.address.cmp(&other.endpoint.address))
            .then_with(|| self.endpoint.description.cmp(&other.endpoint.description))
            .then_with(|| self.endpoint.tls.cmp(&other.endpoint.tls))
    }
}

/// Rules for turning service labels into routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSchema {
    prefix: String,
    default_port: u16,
    default_tls: bool,
}

impl Default for LabelSchema {
    fn default() -> Self {
        Self::from(&LabelConfig::default())
    }
}

impl From<&LabelConfig> for LabelSchema {
    fn from(config: &LabelConfig) -> Self {
        Self {
            prefix: config.prefix.trim_end_matches('.').to_string(),
            default_port: config.default_port,
            default_tls: config.default_tls,
        }
    }
}

impl LabelSchema {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    pub fn with_default_tls(mut self, tls: bool) -> Self {
        self.default_tls = tls;
        self
    }

    /// The full label key for `key`, e.g. `sni-proxy.match`.
    pub fn key(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }

    fn label<'a>(&self, record: &'a ServiceRecord, key: &str) -> Option<&'a str> {
        record
            .labels
            .get(&self.key(key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Map one record. Returns `None` (and logs why) when it is not routable.
    pub fn map(&self, record: &ServiceRecord) -> Option<ServiceInfo> {
        let Some(pattern) = self.label(record, "match") else {
            tracing::trace!(service = %record.name, "Service has no match label, skipping");
            return None;
        };

        let matcher = match Matcher::compile(pattern) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(service = %record.name, error = %e, "Ignoring service with invalid match label");
                return None;
            }
        };

        let address = match self.label(record, "address") {
            Some(address) => address.to_string(),
            None => {
                let port = match self.label(record, "port").map(str::parse::<u16>) {
                    None => self.default_port,
                    Some(Ok(port)) if port != 0 => port,
                    Some(_) => {
                        tracing::warn!(service = %record.name, "Ignoring service with invalid port label");
                        return None;
                    }
                };
                format!("{}:{}", record.name, port)
            }
        };

        let tls = match self.label(record, "tls") {
            None => self.default_tls,
            Some(value) => match parse_bool(value) {
                Some(tls) => tls,
                None => {
                    tracing::warn!(service = %record.name, value = %value, "Ignoring service with invalid tls label");
                    return None;
                }
            },
        };

        let description = self
            .label(record, "description")
            .unwrap_or(record.name.as_str())
            .to_string();

        Some(ServiceInfo::new(
            record.name.clone(),
            matcher,
            Endpoint {
                description,
                address,
                tls,
            },
        ))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Builds service snapshots from a `ServiceSource`.
#[derive(Debug, Clone)]
pub struct ServiceLoader {
    source: Arc<dyn ServiceSource>,
    schema: LabelSchema,
}

impl ServiceLoader {
    pub fn new(source: Arc<dyn ServiceSource>, schema: LabelSchema) -> Self {
        Self { source, schema }
    }

    /// Query the inventory once and build an ordered snapshot.
    pub async fn load(&self) -> Result<Vec<ServiceInfo>, DiscoveryError> {
        let records = self.source.services().await?;

        let mut services: Vec<ServiceInfo> =
            records.iter().filter_map(|r| self.schema.map(r)).collect();
        services.sort_by(ServiceInfo::precedence);

        tracing::debug!(
            records = records.len(),
            routable = services.len(),
            "Service inventory loaded"
        );
        Ok(services)
    }
}
