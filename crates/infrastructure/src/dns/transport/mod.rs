pub(crate) mod framing;
pub mod https;
pub mod tls;
pub mod udp;

pub use https::HttpsDnsClient;
pub use tls::{known_dot_address, TlsDnsClient, TlsStreamPool, TlsTarget};
pub use udp::{SocketState, UdpDnsClient};

use super::load_balancer::{provider_for, SingleProvider};
use sieve_dns_application::ports::DnsClient;
use sieve_dns_domain::config::UpstreamConfig;
use sieve_dns_domain::{DomainError, Forwarder, ForwarderMode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Limits shared by every upstream client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Total attempts per question, first try included.
    pub attempts: u32,
    pub udp_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            attempts: 3,
            udp_timeout: Duration::from_millis(500),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&UpstreamConfig> for TransportOptions {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            attempts: config.retry_budget.max(1),
            udp_timeout: Duration::from_millis(config.udp_timeout_ms),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }
}

/// Builds the upstream client for the configured forwarder mode.
pub fn create_client(config: &UpstreamConfig) -> Result<Arc<dyn DnsClient>, DomainError> {
    let options = TransportOptions::from(config);
    let forwarders = config
        .effective_forwarders()
        .iter()
        .map(|s| Forwarder::parse(config.mode, s))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        mode = %config.mode,
        forwarders = forwarders.len(),
        attempts = options.attempts,
        "Creating upstream DNS client"
    );

    let client: Arc<dyn DnsClient> = match config.mode {
        ForwarderMode::Udp => {
            let addrs = forwarders
                .iter()
                .filter_map(|f| match f {
                    Forwarder::Udp { addr } => Some(*addr),
                    _ => None,
                })
                .collect();
            Arc::new(UdpDnsClient::new(provider_for(addrs)?, options))
        }
        ForwarderMode::Tls => {
            let targets = forwarders
                .iter()
                .map(TlsTarget::from_forwarder)
                .collect::<Result<Vec<_>, _>>()?;
            Arc::new(TlsDnsClient::new(provider_for(targets)?, options)?)
        }
        ForwarderMode::Https => {
            let urls = forwarders
                .iter()
                .filter_map(|f| match f {
                    Forwarder::Https { url, .. } => Some(url.clone()),
                    _ => None,
                })
                .collect();
            let mut client = HttpsDnsClient::new(provider_for(urls)?, options)?;
            if let Some(bootstrap) = bootstrap_address(&config.bootstrap)? {
                info!(bootstrap = %bootstrap, "DoH hostnames will be resolved through bootstrap server");
                let resolver = UdpDnsClient::new(Arc::new(SingleProvider::new(bootstrap)), options);
                client = client.with_bootstrap(Arc::new(resolver));
            }
            Arc::new(client)
        }
    };

    Ok(client)
}

fn bootstrap_address(bootstrap: &str) -> Result<Option<SocketAddr>, DomainError> {
    if bootstrap.trim().is_empty() {
        return Ok(None);
    }
    match Forwarder::parse(ForwarderMode::Udp, bootstrap)? {
        Forwarder::Udp { addr } => Ok(Some(addr)),
        other => Err(DomainError::InvalidConfiguration(format!(
            "Bootstrap server must be a plain DNS address, got {}",
            other
        ))),
    }
}
