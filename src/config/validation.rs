//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every static route pattern
//! - Validate value ranges (intervals > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use url::Url;

use crate::config::schema::ProxyConfig;
use crate::name::Matcher;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a deserialized configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (i, route) in config.routes.iter().enumerate() {
        if let Err(e) = Matcher::compile(&route.pattern) {
            errors.push(ValidationError::new(format!("routes[{i}].pattern"), e.to_string()));
        }
        if let Some(address) = &route.address {
            if address.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("routes[{i}].address"),
                    "address must not be empty (omit it to refuse the pattern)",
                ));
            }
        }
    }

    let discovery = &config.discovery;
    if discovery.enabled {
        match Url::parse(&discovery.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "discovery.endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("discovery.endpoint", e.to_string())),
        }
        if discovery.poll_interval_secs == 0 {
            errors.push(ValidationError::new(
                "discovery.poll_interval_secs",
                "must be greater than zero",
            ));
        }
        if discovery.request_timeout_secs == 0 {
            errors.push(ValidationError::new(
                "discovery.request_timeout_secs",
                "must be greater than zero",
            ));
        }
        if discovery.labels.prefix.trim().is_empty() {
            errors.push(ValidationError::new("discovery.labels.prefix", "must not be empty"));
        }
        if discovery.labels.default_port == 0 {
            errors.push(ValidationError::new(
                "discovery.labels.default_port",
                "must be a valid port",
            ));
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StaticRouteConfig;

    fn route(pattern: &str, address: Option<&str>) -> StaticRouteConfig {
        StaticRouteConfig {
            pattern: pattern.into(),
            address: address.map(Into::into),
            description: None,
            tls: true,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = ProxyConfig::default();
        config.routes.push(route("", Some("a:443")));
        config.routes.push(route("ok.example", Some(" ")));
        config.discovery.poll_interval_secs = 0;
        config.discovery.endpoint = "unix:///var/run/docker.sock".into();
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "routes[0].pattern",
                "routes[1].address",
                "discovery.endpoint",
                "discovery.poll_interval_secs",
                "observability.log_level",
            ]
        );
    }

    #[test]
    fn test_disabled_discovery_skips_discovery_checks() {
        let mut config = ProxyConfig::default();
        config.discovery.enabled = false;
        config.discovery.poll_interval_secs = 0;
        config.discovery.endpoint = "not a url".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_refusing_route_is_valid() {
        let mut config = ProxyConfig::default();
        config.routes.push(route("blocked.example", None));
        assert!(validate_config(&config).is_ok());
    }
}
