//! Server-name pattern matching.
//!
//! # Responsibilities
//! - Compile routing patterns (`foo.example`, `*.example`, `*`)
//! - Test normalised server names against compiled patterns
//!
//! # Design Decisions
//! - Matching is case-insensitive (both sides are case-folded)
//! - A leading `*` label matches exactly one non-empty label
//! - Grammar is validated at compile time; an empty or malformed pattern
//!   is an error, never a silent catch-all

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use super::server_name::{normalize, ServerName};

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A routing pattern was rejected by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid server-name pattern '{pattern}': {reason}")]
pub struct InvalidPattern {
    /// The pattern as supplied.
    pub pattern: String,
    /// Why it was rejected.
    pub reason: &'static str,
}

/// How broad a pattern is. Lower values are more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    Exact,
    Wildcard,
    CatchAll,
}

#[derive(Debug, Clone)]
enum Kind {
    Any,
    Exact,
    /// `*.rest`; holds `.rest` so a probe can be checked with one suffix strip.
    Wildcard { suffix: String },
}

/// A compiled server-name pattern.
///
/// Equality and hashing use the normalised pattern text.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    kind: Kind,
}

impl Matcher {
    /// Compile a pattern.
    pub fn compile(pattern: &str) -> Result<Self, InvalidPattern> {
        let normalized = normalize(pattern);
        let reject = |reason| InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if normalized.is_empty() {
            return Err(reject("pattern is empty"));
        }
        if normalized == "*" {
            return Ok(Self {
                pattern: normalized,
                kind: Kind::Any,
            });
        }
        if normalized.len() > MAX_NAME_LEN {
            return Err(reject("pattern is longer than 253 characters"));
        }

        let mut wildcard = false;
        for (i, label) in normalized.split('.').enumerate() {
            if label.is_empty() {
                return Err(reject("pattern contains an empty label"));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(reject("label is longer than 63 characters"));
            }
            if label == "*" {
                if i != 0 {
                    return Err(reject("wildcard is only allowed as the leading label"));
                }
                wildcard = true;
                continue;
            }
            if label.contains('*') {
                return Err(reject("wildcard must be a whole label"));
            }
            if !label.bytes().all(is_label_byte) {
                return Err(reject("label contains characters outside [a-z0-9-_]"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(reject("label must not start or end with '-'"));
            }
        }

        let kind = if wildcard {
            // leading label is "*" and at least one label follows it
            Kind::Wildcard {
                suffix: normalized[1..].to_string(),
            }
        } else {
            Kind::Exact
        };

        Ok(Self {
            pattern: normalized,
            kind,
        })
    }

    /// The normalised pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn specificity(&self) -> Specificity {
        match self.kind {
            Kind::Exact => Specificity::Exact,
            Kind::Wildcard { .. } => Specificity::Wildcard,
            Kind::Any => Specificity::CatchAll,
        }
    }

    /// Returns true if `name` is matched by this pattern.
    pub fn matches(&self, name: &ServerName) -> bool {
        let name = name.as_str();
        match &self.kind {
            Kind::Any => true,
            Kind::Exact => name == self.pattern,
            Kind::Wildcard { suffix } => name
                .strip_suffix(suffix.as_str())
                .map(|label| !label.is_empty() && !label.contains('.'))
                .unwrap_or(false),
        }
    }
}

fn is_label_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_'
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Matcher {}

impl Hash for Matcher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl FromStr for Matcher {
    type Err = InvalidPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}
