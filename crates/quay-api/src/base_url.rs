//! Node addressing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// URL scheme used to reach a node's httpd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP, used for loopback and onion hosts.
    Http,
    /// HTTPS, the default for public hosts.
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// Address of a node's httpd API.
///
/// IPv6 hostnames keep their brackets, e.g. `[::1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrl {
    pub hostname: String,
    pub port: u16,
    pub scheme: Scheme,
}

impl BaseUrl {
    /// Root of the versioned API on this node.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!("{}://{}:{}/api/v1", self.scheme, self.hostname, self.port)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.hostname, self.port)
    }
}

/// Returns `true` if `addr` points at the local machine.
///
/// Recognized forms, with or without an explicit port: `localhost` and its
/// subdomains, `127.0.0.1` and `[::1]`.
#[must_use]
pub fn is_local(addr: &str) -> bool {
    let host = match strip_port(addr) {
        Some(host) => host,
        None => return false,
    };
    host == "localhost"
        || host.ends_with(".localhost")
        || host == "127.0.0.1"
        || host == "[::1]"
}

/// Splits off a trailing `:port` if one is present, returning the bare host.
///
/// Returns `None` for addresses that cannot be a host at all, such as
/// unterminated IPv6 brackets.
fn strip_port(addr: &str) -> Option<&str> {
    if addr.starts_with('[') {
        let end = addr.find(']')?;
        return Some(&addr[..=end]);
    }
    match addr.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            Some(host)
        }
        Some(_) => None,
        None => Some(addr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local_accepts_loopback_forms() {
        for addr in [
            "localhost",
            "app.localhost",
            "deeper.app.localhost",
            "deeper.app.localhost:8080",
            "127.0.0.1",
            "127.0.0.1:8080",
            "[::1]",
            "[::1]:8080",
            "localhost:3000",
        ] {
            assert!(is_local(addr), "{addr} should be local");
        }
    }

    #[test]
    fn test_is_local_rejects_remote_and_malformed() {
        for addr in [
            "example.com",
            "notlocalhost",
            "127.0.0.1.evil.com",
            "192.168.1.1",
            "10.0.0.1",
            "",
            "not a url",
            "localhost.com",
            "mylocalhost.com",
            "http://example.com",
        ] {
            assert!(!is_local(addr), "{addr} should not be local");
        }
    }

    #[test]
    fn test_api_root_includes_scheme_and_port() {
        let base = BaseUrl {
            hostname: "seed.example.com".to_string(),
            port: 8080,
            scheme: Scheme::Https,
        };
        assert_eq!(base.api_root(), "https://seed.example.com:8080/api/v1");
    }
}
