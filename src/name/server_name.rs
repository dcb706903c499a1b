//! Normalised TLS server names.

use std::fmt;

/// A hostname taken from the SNI extension of a TLS handshake.
///
/// The name is lower-cased and a single trailing dot (fully-qualified form)
/// is removed, so `"Foo.Example."` and `"foo.example"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerName {
    name: String,
}

impl ServerName {
    /// Normalise a raw hostname.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self {
            name: normalize(raw.as_ref()),
        }
    }

    /// The normalised hostname.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for ServerName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ServerName {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for ServerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Shared by patterns and names so both sides of a comparison agree.
pub(crate) fn normalize(raw: &str) -> String {
    raw.strip_suffix('.').unwrap_or(raw).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folding() {
        assert_eq!(ServerName::new("FOO.Example").as_str(), "foo.example");
    }

    #[test]
    fn test_trailing_dot_stripped() {
        assert_eq!(ServerName::new("foo.example.").as_str(), "foo.example");
        assert_eq!(ServerName::new("foo.example."), ServerName::new("FOO.EXAMPLE"));
    }

    #[test]
    fn test_whitespace_preserved() {
        assert_eq!(ServerName::new(" Foo.example").as_str(), " foo.example");
    }
}
