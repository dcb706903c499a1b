//! The orchestration platform as seen by the loader.

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

/// One service as reported by the orchestration platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Platform identifier.
    pub id: String,
    /// Service name; resolvable on the platform's internal network.
    pub name: String,
    /// Service labels / metadata.
    pub labels: BTreeMap<String, String>,
}

impl ServiceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// A failed inventory query. The whole load fails; no partial snapshot.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid discovery endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("service inventory unavailable: {0}")]
    Unavailable(String),
}

/// Queries the current service inventory.
///
/// An empty `Vec` means "no services"; an `Err` means the query failed.
#[async_trait]
pub trait ServiceSource: Send + Sync + Debug {
    async fn services(&self) -> Result<Vec<ServiceRecord>, DiscoveryError>;
}
