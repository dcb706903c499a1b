//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build static table → Build discovery
//!     → Compose fallback chain → Spawn poller → Wait for first load
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → stop() the poller → await its task → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error (bad pattern, bad endpoint) is fatal
//! - Routing traffic only after the first discovery load, bounded by a
//!   startup timeout
//! - Discovery failures after startup are never fatal

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{Backends, StartupError};
