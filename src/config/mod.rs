//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → lifecycle::startup builds the locator graph from it
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; static routes are not reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every problem at once

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DiscoveryConfig, DiscoveryMode, LabelConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    StaticRouteConfig,
};
pub use validation::{validate_config, ValidationError};
