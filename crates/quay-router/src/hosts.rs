//! Mapping between `hostname[:port]` address segments and [`BaseUrl`]s.

use percent_encoding::percent_decode_str;

use quay_api::{is_local, BaseUrl, Scheme};

use crate::config::Config;

/// Derives a [`BaseUrl`] from a raw `hostname[:port]` string.
///
/// The input may arrive URL-encoded and is decoded first. Rules:
///
/// - an explicit port keeps the scheme of its host class (`http` for
///   loopback and `.onion` hosts, the configured default otherwise);
/// - loopback hosts without a port get the local default port and `http`;
/// - `.onion` hosts without a port get the standard default port and `http`;
/// - everything else gets the standard default port and the configured
///   default scheme.
///
/// Returns `None` when the input cannot name a host at all.
#[must_use]
pub fn extract_base_url(input: &str, config: &Config) -> Option<BaseUrl> {
    let decoded = percent_decode_str(input).decode_utf8().ok()?;
    let decoded = decoded.as_ref();
    if decoded.is_empty() || decoded.contains(['/', ' ']) {
        return None;
    }

    let (hostname, port) = split_host_port(decoded)?;
    if hostname.is_empty() {
        return None;
    }

    let local = is_local(hostname);
    let onion = hostname.ends_with(".onion");
    let (port, scheme) = match port {
        Some(port) if local || onion => (port, Scheme::Http),
        Some(port) => (port, config.default_httpd_scheme),
        None if local => (config.default_local_httpd_port, Scheme::Http),
        None if onion => (config.default_httpd_port, Scheme::Http),
        None => (config.default_httpd_port, config.default_httpd_scheme),
    };

    Some(BaseUrl {
        hostname: hostname.to_string(),
        port,
        scheme,
    })
}

/// Writes a [`BaseUrl`] back into the `hostname[:port]` address form.
///
/// The port is omitted when it matches the default [`extract_base_url`]
/// would assign for the hostname, so encoding and extraction stay mutual
/// inverses for addresses the interface itself produces.
#[must_use]
pub fn host_str(base_url: &BaseUrl, config: &Config) -> String {
    let default_port = if is_local(&base_url.hostname) {
        config.default_local_httpd_port
    } else {
        config.default_httpd_port
    };
    if base_url.port == default_port {
        base_url.hostname.clone()
    } else {
        format!("{}:{}", base_url.hostname, base_url.port)
    }
}

/// Splits a trailing `:port`, keeping IPv6 brackets intact.
fn split_host_port(addr: &str) -> Option<(&str, Option<u16>)> {
    if addr.starts_with('[') {
        let end = addr.find(']')?;
        let (host, rest) = addr.split_at(end + 1);
        return match rest.strip_prefix(':') {
            Some(port) => Some((host, Some(port.parse().ok()?))),
            None if rest.is_empty() => Some((host, None)),
            None => None,
        };
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => Some((host, Some(port.parse().ok()?))),
        None => Some((addr, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    fn base(hostname: &str, port: u16, scheme: Scheme) -> BaseUrl {
        BaseUrl {
            hostname: hostname.to_string(),
            port,
            scheme,
        }
    }

    #[test]
    fn test_hostname_with_explicit_port_keeps_default_scheme() {
        assert_eq!(
            extract_base_url("example.com:9000", &config()),
            Some(base("example.com", 9000, Scheme::Https))
        );
    }

    #[test]
    fn test_hostname_without_port_uses_default_port_and_scheme() {
        assert_eq!(
            extract_base_url("example.com", &config()),
            Some(base("example.com", 8080, Scheme::Https))
        );
    }

    #[test]
    fn test_localhost_without_port_uses_local_port_and_http() {
        assert_eq!(
            extract_base_url("localhost", &config()),
            Some(base("localhost", 8081, Scheme::Http))
        );
    }

    #[test]
    fn test_localhost_with_explicit_port_uses_http() {
        assert_eq!(
            extract_base_url("localhost:3000", &config()),
            Some(base("localhost", 3000, Scheme::Http))
        );
    }

    #[test]
    fn test_localhost_subdomain_uses_local_port_and_http() {
        assert_eq!(
            extract_base_url("app.localhost", &config()),
            Some(base("app.localhost", 8081, Scheme::Http))
        );
    }

    #[test]
    fn test_ipv4_loopback_without_port_uses_local_port_and_http() {
        assert_eq!(
            extract_base_url("127.0.0.1", &config()),
            Some(base("127.0.0.1", 8081, Scheme::Http))
        );
    }

    #[test]
    fn test_ipv4_loopback_with_explicit_port_uses_http() {
        assert_eq!(
            extract_base_url("127.0.0.1:8080", &config()),
            Some(base("127.0.0.1", 8080, Scheme::Http))
        );
    }

    #[test]
    fn test_ipv6_loopback_keeps_brackets() {
        assert_eq!(
            extract_base_url("[::1]:8080", &config()),
            Some(base("[::1]", 8080, Scheme::Http))
        );
        assert_eq!(
            extract_base_url("[::1]", &config()),
            Some(base("[::1]", 8081, Scheme::Http))
        );
    }

    #[test]
    fn test_onion_without_port_uses_default_port_and_http() {
        assert_eq!(
            extract_base_url("example.onion", &config()),
            Some(base("example.onion", 8080, Scheme::Http))
        );
    }

    #[test]
    fn test_onion_with_explicit_port_uses_http() {
        assert_eq!(
            extract_base_url("example.onion:9050", &config()),
            Some(base("example.onion", 9050, Scheme::Http))
        );
    }

    #[test]
    fn test_url_encoded_hostname_is_decoded() {
        assert_eq!(
            extract_base_url("example.com%3A8000", &config()),
            Some(base("example.com", 8000, Scheme::Https))
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        for input in ["", "not a host", "example.com:notaport", "[::1", "a/b"] {
            assert_eq!(extract_base_url(input, &config()), None, "{input}");
        }
    }

    #[test]
    fn test_host_str_omits_default_ports() {
        let cfg = config();
        assert_eq!(host_str(&base("example.com", 8080, Scheme::Https), &cfg), "example.com");
        assert_eq!(
            host_str(&base("example.com", 9000, Scheme::Https), &cfg),
            "example.com:9000"
        );
        assert_eq!(host_str(&base("localhost", 8081, Scheme::Http), &cfg), "localhost");
        assert_eq!(
            host_str(&base("localhost", 8080, Scheme::Http), &cfg),
            "localhost:8080"
        );
    }
}
