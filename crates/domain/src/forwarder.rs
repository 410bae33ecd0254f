use crate::config::ForwarderMode;
use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

pub const DNS_PORT: u16 = 53;
pub const DOT_PORT: u16 = 853;

/// One configured upstream, parsed for the transport it will be used with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Forwarder {
    Udp {
        addr: SocketAddr,
    },
    /// `addr` is `None` when the address comes from the built-in DoT table.
    Tls {
        hostname: Arc<str>,
        addr: Option<SocketAddr>,
    },
    Https {
        url: Arc<str>,
        hostname: Arc<str>,
    },
}

impl Forwarder {
    /// Accepted forms:
    /// - udp: `1.1.1.1`, `1.1.1.1:53`, `[2606:4700::1111]:53`
    /// - tls: `one.one.one.one`, `dns.quad9.net@9.9.9.9`, `dns.quad9.net@9.9.9.9:853`
    /// - https: `https://cloudflare-dns.com/dns-query`
    pub fn parse(mode: ForwarderMode, s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        match mode {
            ForwarderMode::Udp => {
                let rest = s.strip_prefix("udp://").unwrap_or(s);
                let addr = parse_socket_addr(rest, DNS_PORT)
                    .ok_or_else(|| invalid(format!("Invalid UDP forwarder '{}'", s)))?;
                Ok(Forwarder::Udp { addr })
            }
            ForwarderMode::Tls => {
                let rest = s.strip_prefix("tls://").unwrap_or(s);
                let (hostname, addr) = match rest.split_once('@') {
                    Some((host, addr_str)) => {
                        let addr = parse_socket_addr(addr_str, DOT_PORT).ok_or_else(|| {
                            invalid(format!("Invalid TLS forwarder address '{}'", addr_str))
                        })?;
                        (host, Some(addr))
                    }
                    None => (rest, None),
                };
                if hostname.is_empty() || hostname.parse::<IpAddr>().is_ok() {
                    return Err(invalid(format!(
                        "TLS forwarder '{}' needs a hostname to authenticate",
                        s
                    )));
                }
                Ok(Forwarder::Tls {
                    hostname: hostname.into(),
                    addr,
                })
            }
            ForwarderMode::Https => {
                let authority = s
                    .strip_prefix("https://")
                    .or_else(|| s.strip_prefix("http://"))
                    .ok_or_else(|| invalid(format!("DoH forwarder '{}' must be a URL", s)))?;
                let host_port = authority.split('/').next().unwrap_or(authority);
                let hostname = match parse_host_port(host_port) {
                    Some((host, _)) => host,
                    None => host_port,
                };
                if hostname.is_empty() {
                    return Err(invalid(format!("DoH forwarder '{}' has no host", s)));
                }
                Ok(Forwarder::Https {
                    url: s.into(),
                    hostname: hostname.into(),
                })
            }
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        match self {
            Forwarder::Tls { hostname, .. } | Forwarder::Https { hostname, .. } => Some(hostname),
            Forwarder::Udp { .. } => None,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Forwarder::Udp { .. } => "UDP",
            Forwarder::Tls { .. } => "TLS",
            Forwarder::Https { .. } => "HTTPS",
        }
    }
}

impl fmt::Display for Forwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Forwarder::Udp { addr } => write!(f, "udp://{}", addr),
            Forwarder::Tls {
                hostname,
                addr: Some(addr),
            } => write!(f, "tls://{}@{}", hostname, addr),
            Forwarder::Tls { hostname, addr: None } => write!(f, "tls://{}", hostname),
            Forwarder::Https { url, .. } => write!(f, "{}", url),
        }
    }
}

fn invalid(message: String) -> DomainError {
    DomainError::InvalidConfiguration(message)
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

/// Accepts a bare IP (taking `default_port`) or a full socket address.
fn parse_socket_addr(s: &str, default_port: u16) -> Option<SocketAddr> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Some(addr);
    }
    let bare = s.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, default_port))
}
