use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Which clients a block/allow list applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListScope {
    Global,
    Client(IpAddr),
}

impl ListScope {
    /// The unspecified address (`0.0.0.0` or `::`) stands for every client.
    /// IPv4-mapped IPv6 addresses, as seen on a dual-stack socket, are
    /// reduced to their IPv4 form.
    pub fn from_ip(ip: IpAddr) -> Self {
        let ip = ip.to_canonical();
        if ip.is_unspecified() {
            ListScope::Global
        } else {
            ListScope::Client(ip)
        }
    }
}

impl FromStr for ListScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(ListScope::Global);
        }
        s.parse::<IpAddr>()
            .map(ListScope::from_ip)
            .map_err(|_| format!("Invalid list scope '{}': expected an IP address or '*'", s))
    }
}

impl fmt::Display for ListScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListScope::Global => write!(f, "*"),
            ListScope::Client(ip) => write!(f, "{}", ip),
        }
    }
}

/// Lowercases and strips one trailing dot, the form list tables are keyed by.
pub fn normalize_domain(domain: &str) -> String {
    let trimmed = domain.trim();
    trimmed
        .strip_suffix('.')
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}
