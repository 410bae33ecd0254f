//! DNS-over-TLS (RFC 7858)
//!
//! Each server hostname owns one slot in a [`TlsStreamPool`]: an async mutex
//! around an optional open stream. A query holds the slot lock for its whole
//! write/read exchange, so pipelined queries on one connection never
//! interleave their frames. Queries to different hosts do not contend.

use super::framing::{read_with_length_prefix, send_with_length_prefix};
use super::TransportOptions;
use crate::dns::load_balancer::EndpointProvider;
use async_trait::async_trait;
use dashmap::DashMap;
use rustls::pki_types::ServerName;
use sieve_dns_application::ports::DnsClient;
use sieve_dns_domain::{DomainError, Forwarder, Message, Question};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const DOT_PORT: u16 = 853;

/// Well-known public DoT resolvers usable by hostname alone.
const KNOWN_DOT_SERVERS: &[(&str, Ipv4Addr)] = &[
    ("one.one.one.one", Ipv4Addr::new(1, 1, 1, 1)),
    ("dns.google", Ipv4Addr::new(8, 8, 8, 8)),
    ("anycast.uncensoreddns.org", Ipv4Addr::new(91, 239, 100, 100)),
    ("dot.xfinity.com", Ipv4Addr::new(96, 113, 151, 145)),
];

pub fn known_dot_address(hostname: &str) -> Option<SocketAddr> {
    let hostname = hostname.trim_end_matches('.');
    KNOWN_DOT_SERVERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(hostname))
        .map(|(_, ip)| SocketAddr::new(IpAddr::V4(*ip), DOT_PORT))
}

/// Where to connect and which name to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsTarget {
    pub hostname: Arc<str>,
    pub addr: SocketAddr,
}

impl TlsTarget {
    pub fn new(hostname: impl Into<Arc<str>>, addr: SocketAddr) -> Self {
        Self {
            hostname: hostname.into(),
            addr,
        }
    }

    pub fn from_forwarder(forwarder: &Forwarder) -> Result<Self, DomainError> {
        match forwarder {
            Forwarder::Tls {
                hostname,
                addr: Some(addr),
            } => Ok(Self::new(hostname.clone(), *addr)),
            Forwarder::Tls {
                hostname,
                addr: None,
            } => known_dot_address(hostname)
                .map(|addr| Self::new(hostname.clone(), addr))
                .ok_or_else(|| DomainError::UnknownTlsServer(hostname.to_string())),
            other => Err(DomainError::InvalidConfiguration(format!(
                "{} is not a DNS-over-TLS forwarder",
                other
            ))),
        }
    }
}

type StreamSlot = Arc<Mutex<Option<TlsStream<TcpStream>>>>;

/// One lazily opened stream per server hostname.
#[derive(Default)]
pub struct TlsStreamPool {
    slots: DashMap<Arc<str>, StreamSlot>,
}

impl TlsStreamPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, hostname: &Arc<str>) -> StreamSlot {
        self.slots
            .entry(hostname.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Hosts that have been contacted at least once.
    pub fn hosts(&self) -> usize {
        self.slots.len()
    }
}

pub fn default_tls_config() -> Result<Arc<rustls::ClientConfig>, DomainError> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| DomainError::Transport(format!("Unsupported TLS configuration: {}", e)))?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Ok(Arc::new(config))
}

pub struct TlsDnsClient {
    targets: Arc<dyn EndpointProvider<TlsTarget>>,
    pool: Arc<TlsStreamPool>,
    connector: TlsConnector,
    options: TransportOptions,
}

impl TlsDnsClient {
    pub fn new(
        targets: Arc<dyn EndpointProvider<TlsTarget>>,
        options: TransportOptions,
    ) -> Result<Self, DomainError> {
        Ok(Self::with_tls_config(targets, options, default_tls_config()?))
    }

    pub fn with_tls_config(
        targets: Arc<dyn EndpointProvider<TlsTarget>>,
        options: TransportOptions,
        config: Arc<rustls::ClientConfig>,
    ) -> Self {
        Self {
            targets,
            pool: Arc::new(TlsStreamPool::new()),
            connector: TlsConnector::from(config),
            options,
        }
    }

    pub fn pool(&self) -> &Arc<TlsStreamPool> {
        &self.pool
    }

    async fn connect_new(&self, target: &TlsTarget) -> Result<TlsStream<TcpStream>, DomainError> {
        let timeout = self.options.request_timeout;
        let server_name = ServerName::try_from(target.hostname.to_string()).map_err(|e| {
            DomainError::InvalidDomainName(format!(
                "Invalid TLS hostname '{}': {}",
                target.hostname, e
            ))
        })?;

        let tcp_stream = tokio::time::timeout(timeout, TcpStream::connect(target.addr))
            .await
            .map_err(|_| {
                DomainError::Transport(format!("Timeout connecting to TLS server {}", target.addr))
            })?
            .map_err(|e| {
                DomainError::Transport(format!(
                    "Connection refused by TLS server {}: {}",
                    target.addr, e
                ))
            })?;
        tcp_stream.set_nodelay(true)?;

        let tls_stream = tokio::time::timeout(timeout, self.connector.connect(server_name, tcp_stream))
            .await
            .map_err(|_| {
                DomainError::Transport(format!("Timeout during TLS handshake with {}", target.addr))
            })?
            .map_err(|e| {
                DomainError::Transport(format!("TLS handshake failed with {}: {}", target.addr, e))
            })?;

        debug!(server = %target.addr, hostname = %target.hostname, "TLS connection established");
        Ok(tls_stream)
    }

    /// Reuses the open stream when there is one. The caller drops the stream
    /// on any error, since a half-written frame leaves it unusable.
    async fn exchange(
        &self,
        stream: &mut Option<TlsStream<TcpStream>>,
        target: &TlsTarget,
        request: &[u8],
        id: u16,
    ) -> Result<Message, DomainError> {
        let timeout = self.options.request_timeout;
        if stream.is_none() {
            *stream = Some(self.connect_new(target).await?);
        }
        let tls = stream
            .as_mut()
            .ok_or_else(|| DomainError::ConnectionClosed(target.hostname.to_string()))?;

        tokio::time::timeout(timeout, send_with_length_prefix(tls, request))
            .await
            .map_err(|_| {
                DomainError::Transport(format!("Timeout sending TLS query to {}", target.addr))
            })??;

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(tls))
            .await
            .map_err(|_| {
                DomainError::Transport(format!(
                    "Timeout waiting for TLS response from {}",
                    target.addr
                ))
            })??;

        let response = Message::decode(&response_bytes)?;
        if response.id() != id {
            return Err(DomainError::MalformedMessage(format!(
                "Response id {} does not match query id {}",
                response.id(),
                id
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl DnsClient for TlsDnsClient {
    async fn resolve(
        &self,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Message, DomainError> {
        let request = Message::query(fastrand::u16(..), question.clone());
        let request_bytes = request.encode()?;

        let attempts = self.options.attempts.max(1);
        for attempt in 1..=attempts {
            let target = self.targets.next_endpoint();
            let slot = self.pool.slot(&target.hostname);
            let mut stream = tokio::select! {
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                stream = slot.lock() => stream,
            };

            let outcome = tokio::select! {
                _ = cancel.cancelled() => Err(DomainError::Cancelled),
                outcome = self.exchange(&mut stream, &target, &request_bytes, request.id()) => outcome,
            };

            match outcome {
                Ok(response) => {
                    debug!(hostname = %target.hostname, question = %question, attempt, "TLS response received");
                    return Ok(response);
                }
                Err(e) if !e.is_retryable() => {
                    *stream = None;
                    return Err(e);
                }
                Err(e) => {
                    *stream = None;
                    warn!(hostname = %target.hostname, question = %question, attempt, error = %e, "TLS attempt failed");
                }
            }
        }

        Err(DomainError::ClientExhausted {
            attempts,
            question: question.to_string(),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_hosts_resolve_to_port_853() {
        assert_eq!(
            known_dot_address("one.one.one.one"),
            Some("1.1.1.1:853".parse().unwrap())
        );
        assert_eq!(
            known_dot_address("DNS.Google."),
            Some("8.8.8.8:853".parse().unwrap())
        );
        assert_eq!(known_dot_address("dns.example.invalid"), None);
    }

    #[test]
    fn explicit_address_wins_over_table() {
        let forwarder = Forwarder::Tls {
            hostname: "one.one.one.one".into(),
            addr: Some("127.0.0.1:8853".parse().unwrap()),
        };
        let target = TlsTarget::from_forwarder(&forwarder).unwrap();
        assert_eq!(target.addr, "127.0.0.1:8853".parse().unwrap());
    }

    #[test]
    fn unknown_hostname_without_address_is_an_error() {
        let forwarder = Forwarder::Tls {
            hostname: "dns.example.invalid".into(),
            addr: None,
        };
        assert!(matches!(
            TlsTarget::from_forwarder(&forwarder),
            Err(DomainError::UnknownTlsServer(_))
        ));
    }

    #[test]
    fn pool_keeps_one_slot_per_host() {
        let pool = TlsStreamPool::new();
        let a: Arc<str> = "a.example".into();
        let b: Arc<str> = "b.example".into();
        let first = pool.slot(&a);
        let again = pool.slot(&a);
        let _other = pool.slot(&b);
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(pool.hosts(), 2);
    }
}
