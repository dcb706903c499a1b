//! Docker Engine API client.
//!
//! # Responsibilities
//! - Query swarm services (`GET /services`) or containers
//!   (`GET /containers/json`) over the Engine HTTP API
//! - Translate the payload into `ServiceRecord`s
//!
//! # Design Decisions
//! - Only the fields routing needs are deserialized; unknown fields ignored
//! - Any transport, status or decode failure fails the whole query

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::config::{DiscoveryConfig, DiscoveryMode};
use crate::discovery::source::{DiscoveryError, ServiceRecord, ServiceSource};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SwarmService {
    #[serde(rename = "ID")]
    id: String,
    spec: SwarmServiceSpec,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SwarmServiceSpec {
    name: String,
    #[serde(default)]
    labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Container {
    id: String,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    labels: Option<BTreeMap<String, String>>,
}

fn parse_services(body: &[u8]) -> Result<Vec<ServiceRecord>, serde_json::Error> {
    let services: Vec<SwarmService> = serde_json::from_slice(body)?;
    Ok(services
        .into_iter()
        .map(|s| ServiceRecord {
            id: s.id,
            name: s.spec.name,
            labels: s.spec.labels.unwrap_or_default(),
        })
        .collect())
}

fn parse_containers(body: &[u8]) -> Result<Vec<ServiceRecord>, serde_json::Error> {
    let containers: Vec<Container> = serde_json::from_slice(body)?;
    Ok(containers
        .into_iter()
        .map(|c| {
            // Docker reports names with a leading slash ("/web")
            let name = c
                .names
                .first()
                .map(|n| n.trim_start_matches('/').to_string())
                .unwrap_or_else(|| c.id.clone());
            ServiceRecord {
                id: c.id,
                name,
                labels: c.labels.unwrap_or_default(),
            }
        })
        .collect())
}

/// Reads the service inventory from a Docker engine or swarm manager.
#[derive(Debug, Clone)]
pub struct DockerSource {
    client: reqwest::Client,
    inventory_url: Url,
    mode: DiscoveryMode,
}

impl DockerSource {
    /// Create a client for the API at `endpoint` (e.g. `http://127.0.0.1:2375`).
    pub fn new(
        endpoint: &str,
        api_version: Option<&str>,
        mode: DiscoveryMode,
        timeout: Duration,
    ) -> Result<Self, DiscoveryError> {
        let invalid = |source| DiscoveryError::InvalidEndpoint {
            url: endpoint.to_string(),
            source,
        };

        let mut base = Url::parse(endpoint).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        if let Some(version) = api_version.map(|v| v.trim_matches('/')).filter(|v| !v.is_empty()) {
            base = base.join(&format!("{version}/")).map_err(invalid)?;
        }

        let path = match mode {
            DiscoveryMode::Services => "services",
            DiscoveryMode::Containers => "containers/json",
        };
        let inventory_url = base.join(path).map_err(invalid)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DiscoveryError::Client)?;

        Ok(Self {
            client,
            inventory_url,
            mode,
        })
    }

    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        Self::new(
            &config.endpoint,
            config.api_version.as_deref(),
            config.mode,
            config.request_timeout(),
        )
    }

    /// The URL queried on every poll.
    pub fn inventory_url(&self) -> &Url {
        &self.inventory_url
    }
}

#[async_trait]
impl ServiceSource for DockerSource {
    async fn services(&self) -> Result<Vec<ServiceRecord>, DiscoveryError> {
        let url = self.inventory_url.to_string();

        let response = self
            .client
            .get(self.inventory_url.clone())
            .send()
            .await
            .map_err(|source| DiscoveryError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| DiscoveryError::Transport {
                url: url.clone(),
                source,
            })?;

        let parsed = match self.mode {
            DiscoveryMode::Services => parse_services(&body),
            DiscoveryMode::Containers => parse_containers(&body),
        };
        let records = parsed.map_err(|source| DiscoveryError::Decode { url, source })?;

        tracing::debug!(count = records.len(), mode = ?self.mode, "Fetched service inventory");
        Ok(records)
    }
}
