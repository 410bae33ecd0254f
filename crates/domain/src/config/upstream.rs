use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport used to reach the forwarders.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForwarderMode {
    Udp,
    #[default]
    Https,
    Tls,
}

impl ForwarderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Https => "https",
            Self::Tls => "tls",
        }
    }

    pub fn default_forwarders(&self) -> Vec<String> {
        let forwarder = match self {
            Self::Udp => "1.1.1.1",
            Self::Https => "https://cloudflare-dns.com/dns-query",
            Self::Tls => "one.one.one.one",
        };
        vec![forwarder.to_string()]
    }
}

impl fmt::Display for ForwarderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForwarderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "https" | "doh" => Ok(Self::Https),
            "tls" | "dot" => Ok(Self::Tls),
            _ => Err(format!("Unknown forwarder mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub mode: ForwarderMode,

    /// Empty means the mode's defaults.
    #[serde(default)]
    pub forwarders: Vec<String>,

    /// Plain DNS server used to resolve DoH hostnames. Empty disables bootstrapping.
    #[serde(default = "default_bootstrap")]
    pub bootstrap: String,

    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,

    #[serde(default = "default_udp_timeout_ms")]
    pub udp_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl UpstreamConfig {
    pub fn effective_forwarders(&self) -> Vec<String> {
        if self.forwarders.is_empty() {
            self.mode.default_forwarders()
        } else {
            self.forwarders.clone()
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            mode: ForwarderMode::default(),
            forwarders: vec![],
            bootstrap: default_bootstrap(),
            retry_budget: default_retry_budget(),
            udp_timeout_ms: default_udp_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_bootstrap() -> String {
    "1.1.1.1".to_string()
}

fn default_retry_budget() -> u32 {
    3
}

fn default_udp_timeout_ms() -> u64 {
    500
}

fn default_request_timeout_ms() -> u64 {
    5000
}
