//! Routable back-end endpoints.

use std::fmt;

/// A back-end server that connections can be forwarded to.
///
/// Immutable once built; compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Human-readable label for logs.
    pub description: String,
    /// `host:port` the proxy engine dials.
    pub address: String,
    /// Whether the back-end itself speaks TLS.
    pub tls: bool,
}

impl Endpoint {
    /// A TLS back-end.
    pub fn new(description: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            address: address.into(),
            tls: true,
        }
    }

    /// A back-end reached over plaintext.
    pub fn plaintext(description: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            tls: false,
            ..Self::new(description, address)
        }
    }

    /// URL scheme for HTTP forwarding to this endpoint.
    pub fn http_scheme(&self) -> &'static str {
        if self.tls {
            "https"
        } else {
            "http"
        }
    }

    /// URL scheme for WebSocket forwarding to this endpoint.
    pub fn websocket_scheme(&self) -> &'static str {
        if self.tls {
            "wss"
        } else {
            "ws"
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{} ({})", self.http_scheme(), self.address, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemes() {
        let secure = Endpoint::new("api", "api:443");
        assert_eq!(secure.http_scheme(), "https");
        assert_eq!(secure.websocket_scheme(), "wss");

        let plain = Endpoint::plaintext("echo", "localhost:8080");
        assert_eq!(plain.http_scheme(), "http");
        assert_eq!(plain.websocket_scheme(), "ws");
        assert_eq!(plain.to_string(), "http://localhost:8080 (echo)");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Endpoint::new("a", "a:443"), Endpoint::new("a", "a:443"));
        assert_ne!(Endpoint::new("a", "a:443"), Endpoint::plaintext("a", "a:443"));
    }
}
