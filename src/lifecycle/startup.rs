//! Startup orchestration: configuration to locator graph.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::backend::{AggregateLocator, Locator, Resolution, StaticLocator};
use crate::config::{ConfigError, ProxyConfig};
use crate::discovery::{
    DiscoveryError, DiscoveryLocator, DockerSource, LabelSchema, ServiceLoader, ServiceSource,
};
use crate::name::{InvalidPattern, ServerName};
use crate::observability::metrics;

/// A fatal problem while wiring the resolution subsystem.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("static route rejected: {0}")]
    Route(#[from] InvalidPattern),

    #[error("discovery setup failed: {0}")]
    Discovery(#[from] DiscoveryError),
}

/// The assembled resolution chain: static routes, then discovery.
#[derive(Debug)]
pub struct Backends {
    locator: AggregateLocator,
    discovery: Option<Arc<DiscoveryLocator>>,
}

impl Backends {
    /// Build from configuration, querying Docker for discovery.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, StartupError> {
        let source = if config.discovery.enabled {
            let docker = DockerSource::from_config(&config.discovery)?;
            tracing::info!(url = %docker.inventory_url(), "Docker service discovery configured");
            Some(Arc::new(docker) as Arc<dyn ServiceSource>)
        } else {
            None
        };
        Self::with_source(config, source)
    }

    /// Build from configuration with an explicit discovery source.
    /// `None` disables discovery regardless of configuration.
    pub fn with_source(
        config: &ProxyConfig,
        source: Option<Arc<dyn ServiceSource>>,
    ) -> Result<Self, StartupError> {
        let static_locator = StaticLocator::from_config(&config.routes)?;
        tracing::info!(routes = static_locator.len(), "Static routes loaded");

        let mut locators: Vec<Arc<dyn Locator>> = vec![Arc::new(static_locator)];

        let discovery = source.map(|source| {
            let loader = ServiceLoader::new(source, LabelSchema::from(&config.discovery.labels));
            Arc::new(
                DiscoveryLocator::new(loader).with_poll_interval(config.discovery.poll_interval()),
            )
        });
        if let Some(discovery) = &discovery {
            locators.push(discovery.clone());
        }

        Ok(Self {
            locator: AggregateLocator::new(locators),
            discovery,
        })
    }

    pub fn discovery(&self) -> Option<&Arc<DiscoveryLocator>> {
        self.discovery.as_ref()
    }

    /// Spawn the discovery poll loop, if discovery is enabled.
    pub fn spawn_discovery(&self) -> Option<JoinHandle<()>> {
        let discovery = self.discovery.clone()?;
        Some(tokio::spawn(async move { discovery.run().await }))
    }

    /// Wait for the first discovery load, at most `timeout`.
    ///
    /// Returns false if the timeout elapsed first. Without discovery this
    /// returns true immediately.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        match &self.discovery {
            Some(discovery) => tokio::time::timeout(timeout, discovery.ready()).await.is_ok(),
            None => true,
        }
    }

    /// Stop the discovery poll loop. Idempotent.
    pub fn stop(&self) {
        if let Some(discovery) = &self.discovery {
            discovery.stop();
        }
    }

    /// Resolve a server name through the full chain.
    pub fn locate(&self, name: &ServerName) -> Resolution {
        let resolution = self.locator.locate(name);
        metrics::record_locate(resolution.kind());
        tracing::debug!(server_name = %name, result = resolution.kind(), "Located back-end");
        resolution
    }
}

impl Locator for Backends {
    fn locate(&self, name: &ServerName) -> Resolution {
        Backends::locate(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticRouteConfig;
    use crate::discovery::ServiceRecord;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct OneService;

    #[async_trait]
    impl ServiceSource for OneService {
        async fn services(&self) -> Result<Vec<ServiceRecord>, DiscoveryError> {
            Ok(vec![
                ServiceRecord::new("1", "app").with_label("sni-proxy.match", "*.apps.example"),
                ServiceRecord::new("2", "admin").with_label("sni-proxy.match", "admin.example"),
            ])
        }
    }

    fn config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.routes.push(StaticRouteConfig {
            pattern: "static.apps.example".into(),
            address: Some("localhost:8080".into()),
            description: Some("local-echo-server".into()),
            tls: false,
        });
        config.routes.push(StaticRouteConfig {
            pattern: "admin.example".into(),
            address: None,
            description: None,
            tls: true,
        });
        config
    }

    #[tokio::test]
    async fn test_static_routes_take_precedence() {
        let backends = Backends::with_source(&config(), Some(Arc::new(OneService))).unwrap();
        let handle = backends.spawn_discovery().unwrap();
        assert!(backends.wait_ready(Duration::from_secs(1)).await);

        let echo = backends.locate(&ServerName::new("static.apps.example")).into_endpoint().unwrap();
        assert_eq!(echo.address, "localhost:8080");

        let app = backends.locate(&ServerName::new("x.apps.example")).into_endpoint().unwrap();
        assert_eq!(app.address, "app:443");

        // statically refused even though discovery knows it
        assert_eq!(backends.locate(&ServerName::new("admin.example")), Resolution::Refused);
        assert_eq!(backends.locate(&ServerName::new("nope.example")), Resolution::NoMatch);

        backends.stop();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_without_discovery() {
        let backends = Backends::with_source(&config(), None).unwrap();
        assert!(backends.discovery().is_none());
        assert!(backends.spawn_discovery().is_none());
        assert!(backends.wait_ready(Duration::ZERO).await);
        backends.stop();
        assert_eq!(backends.locate(&ServerName::new("x.apps.example")), Resolution::NoMatch);
    }

    #[test]
    fn test_bad_static_pattern_is_fatal() {
        let mut config = ProxyConfig::default();
        config.routes.push(StaticRouteConfig {
            pattern: "".into(),
            address: Some("a:1".into()),
            description: None,
            tls: true,
        });
        let err = Backends::with_source(&config, None).unwrap_err();
        assert!(matches!(err, StartupError::Route(_)));
    }

    #[test]
    fn test_bad_discovery_endpoint_is_fatal() {
        let mut config = ProxyConfig::default();
        config.discovery.endpoint = "::not-a-url".into();
        let err = Backends::from_config(&config).unwrap_err();
        assert!(matches!(err, StartupError::Discovery(DiscoveryError::InvalidEndpoint { .. })));
    }
}
