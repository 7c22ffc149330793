//! URL validation for SSRF protection.
//!
//! Both the local fetcher and the scrape worker accept URLs from
//! untrusted callers, so every target goes through [`UrlValidator`].

use std::collections::HashSet;
use std::net::IpAddr;

use ipnet::IpNet;
use tracing::debug;

use crate::error::{SecurityError, SecurityResult};

/// URL validator for SSRF protection.
///
/// Rejects:
/// - internal services (localhost, 127.0.0.1)
/// - private IP ranges (10.x, 172.16.x, 192.168.x)
/// - cloud metadata services (169.254.x)
/// - non-HTTP(S) schemes (file://, ftp://)
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allowed_schemes: HashSet<String>,
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<IpNet>,

    /// Hosts that skip every other check
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

const BLOCKED_HOSTS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "::1",
    "[::1]",
    "0.0.0.0",
    "metadata.google.internal",
    "metadata.gke.internal",
    "instance-data",
];

const BLOCKED_CIDRS: &[&str] = &[
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",  // Carrier-grade NAT
    "127.0.0.0/8",    // Loopback
    "169.254.0.0/16", // Link-local / cloud metadata
    "172.16.0.0/12",
    "192.168.0.0/16",
    "::1/128",
    "fc00::/7",  // IPv6 private
    "fe80::/10", // IPv6 link-local
];

impl UrlValidator {
    /// Create a new URL validator with default security rules.
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: BLOCKED_HOSTS.iter().map(|h| h.to_string()).collect(),
            blocked_cidrs: BLOCKED_CIDRS
                .iter()
                .filter_map(|cidr| cidr.parse().ok())
                .collect(),
            allowed_hosts: HashSet::new(),
        }
    }

    /// Only enforce the scheme rule.
    ///
    /// For local development, where the worker is pointed at pages
    /// served from the same machine.
    pub fn permissive() -> Self {
        Self {
            blocked_hosts: HashSet::new(),
            blocked_cidrs: Vec::new(),
            ..Self::new()
        }
    }

    /// Add an allowed host (bypasses validation).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Block an additional host.
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into());
        self
    }

    /// Block an additional CIDR range.
    pub fn block_cidr(mut self, cidr: IpNet) -> Self {
        self.blocked_cidrs.push(cidr);
        self
    }

    /// Validate a URL without touching the network.
    pub fn validate(&self, url: &str) -> SecurityResult<()> {
        let parsed = url::Url::parse(url)?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        if self.blocked_hosts.contains(host) {
            return Err(SecurityError::BlockedHost(host.to_string()));
        }

        // IPv6 literals come back bracketed from host_str
        let literal = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = literal.parse::<IpAddr>() {
            self.check_ip(&ip)?;
        }

        Ok(())
    }

    /// Validate a URL and resolve DNS to check the actual IP.
    ///
    /// Catches hostnames that resolve to internal addresses.
    pub async fn validate_with_dns(&self, url: &str) -> SecurityResult<()> {
        self.validate(url)?;

        let parsed = url::Url::parse(url)?;
        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) || self.blocked_cidrs.is_empty() {
            return Ok(());
        }

        let literal = host.trim_start_matches('[').trim_end_matches(']');
        if literal.parse::<IpAddr>().is_ok() {
            return Ok(());
        }

        let port = parsed.port_or_known_default().unwrap_or(80);
        let addrs = tokio::net::lookup_host(format!("{}:{}", host, port))
            .await
            .map_err(|e| SecurityError::DnsResolution(e.to_string()))?;

        for addr in addrs {
            self.check_ip(&addr.ip()).map_err(|_| {
                SecurityError::BlockedCidr(format!(
                    "DNS for {} resolved to blocked IP {}",
                    host,
                    addr.ip()
                ))
            })?;
        }

        debug!(host = %host, "URL passed DNS validation");
        Ok(())
    }

    fn check_ip(&self, ip: &IpAddr) -> SecurityResult<()> {
        match self.blocked_cidrs.iter().find(|cidr| cidr.contains(ip)) {
            Some(_) => Err(SecurityError::BlockedCidr(ip.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_localhost() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://localhost/").is_err());
        assert!(validator.validate("http://127.0.0.1/").is_err());
        assert!(validator.validate("http://[::1]/").is_err());
    }

    #[test]
    fn test_blocks_private_ips() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://10.0.0.1/").is_err());
        assert!(validator.validate("http://172.16.0.1/").is_err());
        assert!(validator.validate("http://192.168.1.1/").is_err());
        assert!(validator.validate("http://[fe80::1]/").is_err());
    }

    #[test]
    fn test_blocks_metadata_services() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://169.254.169.254/").is_err());
        assert!(validator.validate("http://metadata.google.internal/").is_err());
    }

    #[test]
    fn test_blocks_non_http() {
        let validator = UrlValidator::new();
        assert!(matches!(
            validator.validate("file:///etc/passwd"),
            Err(SecurityError::DisallowedScheme(_))
        ));
        assert!(validator.validate("ftp://example.com/").is_err());
        assert!(matches!(
            validator.validate("not a url"),
            Err(SecurityError::UrlParse(_))
        ));
    }

    #[test]
    fn test_allows_public_urls() {
        let validator = UrlValidator::new();
        assert!(validator.validate("https://www.seek.co.nz/job/1").is_ok());
        assert!(validator.validate("http://8.8.8.8/").is_ok());
    }

    #[test]
    fn test_allowed_hosts_bypass() {
        let validator = UrlValidator::new().allow_host("localhost");
        assert!(validator.validate("http://localhost/").is_ok());
    }

    #[test]
    fn test_permissive_keeps_scheme_rule() {
        let validator = UrlValidator::permissive();
        assert!(validator.validate("http://127.0.0.1:8080/job").is_ok());
        assert!(validator.validate("file:///etc/passwd").is_err());
    }

    #[tokio::test]
    async fn test_dns_check_skips_ip_literals() {
        let validator = UrlValidator::new();
        assert!(validator.validate_with_dns("http://8.8.8.8/").await.is_ok());
        assert!(validator.validate_with_dns("http://10.1.2.3/").await.is_err());
    }
}
