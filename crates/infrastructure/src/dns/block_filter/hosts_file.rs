//! Hosts-format list files.
//!
//! Each non-comment line is either `<ip> <domain> [<domain>...]` or a bare
//! `<domain>`. Text after `#` is ignored.

use sieve_dns_domain::normalize_domain;
use std::net::IpAddr;

/// Names that hosts files map to loopback for the system's own use.
const RESERVED_HOST_NAMES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "local",
    "broadcasthost",
    "ip6-localhost",
    "ip6-loopback",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsEntry {
    pub domain: String,
    /// `None` for bare domains and for sink addresses like `0.0.0.0`.
    pub override_ip: Option<IpAddr>,
}

pub fn parse_hosts(contents: &str) -> Vec<HostsEntry> {
    contents.lines().flat_map(parse_line).collect()
}

fn parse_line(line: &str) -> Vec<HostsEntry> {
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Vec::new();
    };

    match first.parse::<IpAddr>() {
        Ok(ip) => {
            let override_ip = (!ip.is_unspecified()).then_some(ip);
            tokens
                .filter_map(|name| entry(name, override_ip))
                .collect()
        }
        Err(_) => entry(first, None).into_iter().collect(),
    }
}

fn entry(name: &str, override_ip: Option<IpAddr>) -> Option<HostsEntry> {
    let domain = normalize_domain(name);
    if domain.is_empty() || RESERVED_HOST_NAMES.contains(&domain.as_str()) {
        return None;
    }
    Some(HostsEntry {
        domain,
        override_ip,
    })
}
