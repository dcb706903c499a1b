//! Back-end resolution subsystem.
//!
//! # Data Flow
//! ```text
//! ServerName (from the TLS layer)
//!     → AggregateLocator (ordered fallback chain)
//!         → StaticLocator (configured table, first match wins)
//!         → DiscoveryLocator (published service snapshot)
//!     → Resolution::{Found, Refused, NoMatch}
//!     → proxy engine forwards or rejects
//! ```
//!
//! # Design Decisions
//! - `locate` is synchronous: it is on the hot path of every connection
//!   and never touches the network
//! - Three-state result so "explicitly no route" stops the fallback chain
//!   while "no opinion" falls through
//! - Locator graphs are fixed at construction; only the discovery snapshot
//!   changes at runtime

pub mod aggregate;
pub mod endpoint;
pub mod static_locator;

use std::fmt::Debug;
use std::sync::Arc;

use crate::name::ServerName;

pub use aggregate::AggregateLocator;
pub use endpoint::Endpoint;
pub use static_locator::StaticLocator;

/// Outcome of a single `locate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A rule matched and routes to this endpoint.
    Found(Arc<Endpoint>),
    /// A rule matched and deliberately maps to no endpoint.
    Refused,
    /// No rule matched; the next locator may have an opinion.
    NoMatch,
}

impl Resolution {
    /// True for `Found` and `Refused`, i.e. a locator claimed the name.
    pub fn is_match(&self) -> bool {
        !matches!(self, Resolution::NoMatch)
    }

    /// Collapse to what the forwarding layer needs: an endpoint or nothing.
    pub fn into_endpoint(self) -> Option<Arc<Endpoint>> {
        match self {
            Resolution::Found(endpoint) => Some(endpoint),
            Resolution::Refused | Resolution::NoMatch => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Found(_) => "found",
            Resolution::Refused => "refused",
            Resolution::NoMatch => "no_match",
        }
    }
}

impl From<Option<Arc<Endpoint>>> for Resolution {
    /// A matched rule's endpoint slot; `None` is an explicit refusal.
    fn from(endpoint: Option<Arc<Endpoint>>) -> Self {
        match endpoint {
            Some(endpoint) => Resolution::Found(endpoint),
            None => Resolution::Refused,
        }
    }
}

/// Finds the back-end for a TLS server name.
pub trait Locator: Send + Sync + Debug {
    /// Resolve `name`. Must not block or perform I/O.
    fn locate(&self, name: &ServerName) -> Resolution;
}

impl<L: Locator + ?Sized> Locator for Arc<L> {
    fn locate(&self, name: &ServerName) -> Resolution {
        (**self).locate(name)
    }
}

impl<L: Locator + ?Sized> Locator for Box<L> {
    fn locate(&self, name: &ServerName) -> Resolution {
        (**self).locate(name)
    }
}
