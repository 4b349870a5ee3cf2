use std::collections::BTreeSet;
use std::net::IpAddr;

use thiserror::Error;

/// SSRF guard applied to every outbound URL before dispatch.
#[derive(Debug, Clone)]
pub struct UrlGuardConfig {
    /// Allowed URL schemes. Defaults to http and https.
    pub allowed_schemes: BTreeSet<String>,
    /// Exact or parent-domain host allowlist. Empty means any public host.
    pub allowed_hosts: BTreeSet<String>,
    /// Hosts denied regardless of the allowlist.
    pub blocked_hosts: BTreeSet<String>,
    /// Ports denied for outbound requests.
    pub blocked_ports: BTreeSet<u16>,
    /// Deny literal private/loopback/link-local IPs in the host.
    pub deny_private_ips: bool,
}

impl Default for UrlGuardConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            allowed_hosts: BTreeSet::new(),
            // Cloud metadata endpoints (AWS/GCP/Azure IMDS, AWS IPv6 IMDS,
            // Alibaba metadata).
            blocked_hosts: [
                "169.254.169.254",
                "metadata.google.internal",
                "fd00:ec2::254",
                "100.100.100.200",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            // ssh, telnet, smtp, pop3, imap, mysql, postgres, redis, mongodb
            blocked_ports: [22, 23, 25, 110, 143, 3306, 5432, 6379, 27017]
                .into_iter()
                .collect(),
            deny_private_ips: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("disallowed URL scheme: '{0}'")]
    DisallowedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("blocked host: '{0}' is a metadata endpoint")]
    BlockedHost(String),
    #[error("host '{0}' is not allowed")]
    HostNotAllowed(String),
    #[error("blocked IP: {0} is in a private range")]
    PrivateIp(IpAddr),
    #[error("blocked port: {0}")]
    BlockedPort(u16),
}

/// Parse and screen an outbound URL. No DNS resolution happens here; only
/// literal IP hosts are range-checked.
pub fn validate_url(input: &str, config: &UrlGuardConfig) -> Result<url::Url, GuardError> {
    let parsed = url::Url::parse(input).map_err(|e| GuardError::InvalidUrl(e.to_string()))?;

    if !config.allowed_schemes.contains(parsed.scheme()) {
        return Err(GuardError::DisallowedScheme(parsed.scheme().to_string()));
    }

    let host = parsed.host().ok_or(GuardError::MissingHost)?;
    let host_text = match &host {
        url::Host::Domain(d) => (*d).to_string(),
        url::Host::Ipv4(v4) => v4.to_string(),
        url::Host::Ipv6(v6) => v6.to_string(),
    };

    if config.blocked_hosts.contains(&host_text) {
        return Err(GuardError::BlockedHost(host_text));
    }

    if !config.allowed_hosts.is_empty() && !host_allowed(&config.allowed_hosts, &host_text) {
        return Err(GuardError::HostNotAllowed(host_text));
    }

    if config.deny_private_ips {
        let ip = match host {
            url::Host::Ipv4(v4) => Some(IpAddr::V4(v4)),
            url::Host::Ipv6(v6) => Some(IpAddr::V6(v6)),
            url::Host::Domain(_) => None,
        };
        if let Some(ip) = ip {
            if is_private_ip(&ip) {
                return Err(GuardError::PrivateIp(ip));
            }
        }
    }

    if let Some(port) = parsed.port() {
        if config.blocked_ports.contains(&port) {
            return Err(GuardError::BlockedPort(port));
        }
    }

    Ok(parsed)
}

// Exact match or subdomain match (allowing "example.com" matches
// "api.example.com").
fn host_allowed(allowed_hosts: &BTreeSet<String>, host: &str) -> bool {
    if allowed_hosts.contains(host) {
        return true;
    }
    allowed_hosts.iter().any(|h| host.ends_with(&format!(".{h}")))
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            // 10/8
            if o[0] == 10 {
                return true;
            }
            // 127/8 loopback
            if o[0] == 127 {
                return true;
            }
            // 192.168/16
            if o[0] == 192 && o[1] == 168 {
                return true;
            }
            // 172.16/12
            if o[0] == 172 && (16..=31).contains(&o[1]) {
                return true;
            }
            // link-local 169.254/16
            if o[0] == 169 && o[1] == 254 {
                return true;
            }
            // carrier-grade NAT 100.64/10
            if o[0] == 100 && (64..=127).contains(&o[1]) {
                return true;
            }
            false
        }
        IpAddr::V6(v6) => {
            // ::1 loopback, fe80::/10 link-local, fc00::/7 unique local.
            v6.is_loopback()
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
                || v6.segments()[0] & 0xfe00 == 0xfc00
        }
    }
}
