//! Dynamic back-end discovery subsystem.
//!
//! # Data Flow
//! ```text
//! Background task (locator.rs run loop):
//!     interval timer elapses
//!     → loader.rs ServiceLoader::load
//!         → source.rs ServiceSource::services (docker.rs: Docker Engine API)
//!         → LabelSchema maps each record to a ServiceInfo (bad records skipped)
//!     → diff.rs compares against the published snapshot (logs added/removed)
//!     → atomic swap of Arc<Vec<ServiceInfo>>
//!
//! Connection tasks (hot path):
//!     DiscoveryLocator::locate
//!     → one lock-free load of the published snapshot
//!     → first matching ServiceInfo
//! ```
//!
//! # Design Decisions
//! - Single writer, many readers: ArcSwap instead of a lock around the table
//! - A failed poll keeps the previous snapshot (stale but consistent)
//! - Snapshots are never mutated after publication
//! - Diffing is observability only; it never decides what gets published

pub mod diff;
pub mod docker;
pub mod loader;
pub mod locator;
pub mod source;

pub use diff::{diff, ChangeSet};
pub use docker::DockerSource;
pub use loader::{LabelSchema, ServiceInfo, ServiceLoader};
pub use locator::{DiscoveryLocator, DEFAULT_POLL_INTERVAL};
pub use source::{DiscoveryError, ServiceRecord, ServiceSource};
