//! Ordered composition of locators.

use std::sync::Arc;

use crate::backend::{Locator, Resolution};
use crate::name::ServerName;

/// Tries each locator in order and returns the first claim on the name.
///
/// A `Refused` result counts as a claim, so a static "no route" entry
/// overrides anything discovered later in the chain.
#[derive(Debug, Clone, Default)]
pub struct AggregateLocator {
    locators: Vec<Arc<dyn Locator>>,
}

impl AggregateLocator {
    pub fn new(locators: Vec<Arc<dyn Locator>>) -> Self {
        Self { locators }
    }
}

impl FromIterator<Arc<dyn Locator>> for AggregateLocator {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Locator>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Locator for AggregateLocator {
    fn locate(&self, name: &ServerName) -> Resolution {
        self.locators
            .iter()
            .map(|locator| locator.locate(name))
            .find(Resolution::is_match)
            .unwrap_or(Resolution::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Endpoint, StaticLocator};

    fn endpoint() -> Endpoint {
        Endpoint::new("x", "x:443")
    }

    fn aggregate(locators: Vec<StaticLocator>) -> AggregateLocator {
        locators
            .into_iter()
            .map(|l| Arc::new(l) as Arc<dyn Locator>)
            .collect()
    }

    #[test]
    fn test_falls_through_no_match() {
        let subject = aggregate(vec![
            StaticLocator::new(),
            StaticLocator::new().with("x", Some(endpoint())).unwrap(),
        ]);

        let found = subject.locate(&ServerName::new("x")).into_endpoint();
        assert_eq!(found.as_deref(), Some(&endpoint()));
    }

    #[test]
    fn test_explicit_no_route_short_circuits() {
        let subject = aggregate(vec![
            StaticLocator::new().with("x", None).unwrap(),
            StaticLocator::new().with("x", Some(endpoint())).unwrap(),
        ]);

        assert_eq!(subject.locate(&ServerName::new("x")), Resolution::Refused);
    }

    #[test]
    fn test_first_claim_wins() {
        let subject = aggregate(vec![
            StaticLocator::new().with("*", Some(Endpoint::new("first", "first:443"))).unwrap(),
            StaticLocator::new().with("x", Some(endpoint())).unwrap(),
        ]);

        let found = subject.locate(&ServerName::new("x")).into_endpoint().unwrap();
        assert_eq!(found.address, "first:443");
    }

    #[test]
    fn test_all_no_match() {
        let subject = aggregate(vec![StaticLocator::new(), StaticLocator::new()]);
        assert_eq!(subject.locate(&ServerName::new("x")), Resolution::NoMatch);
        assert_eq!(AggregateLocator::default().locate(&ServerName::new("x")), Resolution::NoMatch);
    }
}
