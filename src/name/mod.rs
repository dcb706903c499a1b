//! Server-name handling subsystem.
//!
//! # Data Flow
//! ```text
//! Raw SNI hostname (per inbound connection)
//!     → server_name.rs (case-fold, strip trailing dot)
//!     → ServerName (immutable)
//!
//! Routing pattern (at startup / per discovered service)
//!     → matcher.rs (validate grammar, classify)
//!     → Matcher (immutable, cheap to test)
//! ```
//!
//! # Design Decisions
//! - Patterns are compiled once and rejected loudly when malformed
//! - No regex: matching is O(labels) string comparison
//! - `*` as the leading label matches exactly one label
//! - `*` on its own matches every name

pub mod matcher;
pub mod server_name;

pub use matcher::{InvalidPattern, Matcher, Specificity};
pub use server_name::ServerName;
