//! TLS SNI back-end resolution.
//!
//! Maps the server name of an inbound TLS connection to the back-end that
//! should receive it, using a static table first and services discovered
//! from Docker second.

pub mod backend;
pub mod config;
pub mod discovery;
pub mod lifecycle;
pub mod name;
pub mod observability;

pub use backend::{AggregateLocator, Endpoint, Locator, Resolution, StaticLocator};
pub use config::schema::ProxyConfig;
pub use discovery::DiscoveryLocator;
pub use lifecycle::Backends;
pub use name::{Matcher, ServerName};
