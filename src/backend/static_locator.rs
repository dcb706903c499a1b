//! Static routing table.
//!
//! # Responsibilities
//! - Hold configured (pattern, endpoint) pairs in insertion order
//! - Return the first matching entry's endpoint
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins, not best match
//! - An entry may map to no endpoint: that is an explicit refusal and
//!   stops an aggregate from consulting later locators

use std::sync::Arc;

use crate::backend::{Endpoint, Locator, Resolution};
use crate::config::StaticRouteConfig;
use crate::name::{InvalidPattern, Matcher, ServerName};

#[derive(Debug, Clone)]
struct StaticRoute {
    matcher: Matcher,
    endpoint: Option<Arc<Endpoint>>,
}

/// A locator backed by an explicitly populated, ordered table.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    routes: Vec<StaticRoute>,
}

impl StaticLocator {
    /// An empty table; matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route, compiling `pattern`.
    ///
    /// `None` maps the pattern to "no route".
    pub fn with(self, pattern: &str, endpoint: Option<Endpoint>) -> Result<Self, InvalidPattern> {
        let matcher = Matcher::compile(pattern)?;
        Ok(self.with_matcher(matcher, endpoint))
    }

    /// Append a route with an already compiled matcher.
    pub fn with_matcher(mut self, matcher: Matcher, endpoint: Option<Endpoint>) -> Self {
        self.routes.push(StaticRoute {
            matcher,
            endpoint: endpoint.map(Arc::new),
        });
        self
    }

    /// Build the table from configuration, preserving file order.
    pub fn from_config(routes: &[StaticRouteConfig]) -> Result<Self, InvalidPattern> {
        routes.iter().try_fold(Self::new(), |locator, route| {
            locator.with(&route.pattern, route.endpoint())
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Locator for StaticLocator {
    fn locate(&self, name: &ServerName) -> Resolution {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(name))
            .map(|route| Resolution::from(route.endpoint.clone()))
            .unwrap_or(Resolution::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> StaticLocator {
        StaticLocator::new()
            .with("foo", Some(Endpoint::new("foo", "foo:443")))
            .unwrap()
            .with("bar", Some(Endpoint::new("bar", "bar1:443")))
            .unwrap()
            .with("bar", Some(Endpoint::new("bar", "bar2:443")))
            .unwrap()
    }

    fn address(resolution: Resolution) -> Option<String> {
        resolution.into_endpoint().map(|e| e.address.clone())
    }

    #[test]
    fn test_matches_endpoint() {
        let found = subject().locate(&ServerName::new("foo"));
        assert_eq!(address(found), Some("foo:443".to_string()));
    }

    #[test]
    fn test_matches_in_insertion_order() {
        let found = subject().locate(&ServerName::new("bar"));
        assert_eq!(address(found), Some("bar1:443".to_string()));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(subject().locate(&ServerName::new("unknown")), Resolution::NoMatch);
        assert_eq!(StaticLocator::new().locate(&ServerName::new("foo")), Resolution::NoMatch);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(subject().with("", None).is_err());
        assert!(subject().with("a.*", None).is_err());
    }

    #[test]
    fn test_explicit_no_route_shadows_catch_all() {
        let locator = StaticLocator::new()
            .with("nomatch", None)
            .unwrap()
            .with("*", Some(Endpoint::new("catch-all", "catch-all:443")))
            .unwrap();

        assert_eq!(locator.locate(&ServerName::new("nomatch")), Resolution::Refused);
        assert_eq!(
            address(locator.locate(&ServerName::new("other"))),
            Some("catch-all:443".to_string())
        );
    }

    #[test]
    fn test_builder_yields_independent_tables() {
        let base = StaticLocator::new()
            .with("a", Some(Endpoint::new("a", "a:443")))
            .unwrap();
        let extended = base.clone().with("b", Some(Endpoint::new("b", "b:443"))).unwrap();

        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(base.locate(&ServerName::new("b")), Resolution::NoMatch);
    }

    #[test]
    fn test_from_config() {
        let routes = vec![
            StaticRouteConfig {
                pattern: "*.internal.example".into(),
                address: Some("10.0.0.1:8443".into()),
                description: Some("internal".into()),
                tls: true,
            },
            StaticRouteConfig {
                pattern: "blocked.internal.example".into(),
                address: None,
                description: None,
                tls: true,
            },
        ];
        let locator = StaticLocator::from_config(&routes).unwrap();

        assert_eq!(locator.len(), 2);
        assert_eq!(
            address(locator.locate(&ServerName::new("api.internal.example"))),
            Some("10.0.0.1:8443".to_string())
        );
        // earlier wildcard wins over the later exact entry
        assert!(matches!(
            locator.locate(&ServerName::new("blocked.internal.example")),
            Resolution::Found(_)
        ));
    }
}
