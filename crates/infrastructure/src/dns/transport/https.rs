//! DNS-over-HTTPS transport (RFC 8484)
//!
//! Sends DNS queries as HTTP POST requests with `application/dns-message` content type.
//! The request body is the raw DNS wire format message, and the response body
//! contains the raw DNS wire format response.
//!
//! When a bootstrap client is configured, the DoH hostname is resolved through
//! it once and pinned into a dedicated HTTP client. The request URL keeps the
//! hostname, so the Host header and TLS SNI are unchanged.
//!
//! Wire format (HTTP):
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::TransportOptions;
use crate::dns::load_balancer::EndpointProvider;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use sieve_dns_application::ports::DnsClient;
use sieve_dns_domain::{DomainError, Message, Question, RData, RecordType};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Expected content type for DNS-over-HTTPS responses (RFC 8484 §4.2.1)
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// RFC 8484 §4.1 recommends id 0 so HTTP caches can share responses.
const DOH_QUERY_ID: u16 = 0;

struct PinnedEndpoint {
    address: SocketAddr,
    resolved_uri: String,
    client: reqwest::Client,
}

struct Bootstrap {
    resolver: Arc<dyn DnsClient>,
    pinned: DashMap<String, Arc<PinnedEndpoint>>,
}

pub struct HttpsDnsClient {
    urls: Arc<dyn EndpointProvider<Arc<str>>>,
    client: reqwest::Client,
    bootstrap: Option<Bootstrap>,
    options: TransportOptions,
}

impl HttpsDnsClient {
    pub fn new(
        urls: Arc<dyn EndpointProvider<Arc<str>>>,
        options: TransportOptions,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            urls,
            client: build_http_client(options, None)?,
            bootstrap: None,
            options,
        })
    }

    /// Resolve DoH hostnames through `resolver` instead of the system resolver.
    pub fn with_bootstrap(mut self, resolver: Arc<dyn DnsClient>) -> Self {
        self.bootstrap = Some(Bootstrap {
            resolver,
            pinned: DashMap::new(),
        });
        self
    }

    /// The address-form URI a bootstrapped hostname was pinned to.
    pub fn resolved_uri(&self, hostname: &str) -> Option<String> {
        let bootstrap = self.bootstrap.as_ref()?;
        bootstrap
            .pinned
            .get(hostname)
            .map(|entry| entry.resolved_uri.clone())
    }

    async fn client_for(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Client, DomainError> {
        let Some(bootstrap) = &self.bootstrap else {
            return Ok(self.client.clone());
        };
        let Some(host) = url.host_str() else {
            return Ok(self.client.clone());
        };
        if host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>().is_ok() {
            return Ok(self.client.clone());
        }
        if let Some(entry) = bootstrap.pinned.get(host) {
            return Ok(entry.client.clone());
        }

        let question = Question::internet(host, RecordType::A)?;
        let response = bootstrap.resolver.resolve(&question, cancel).await?;
        let ip = response
            .answers
            .iter()
            .find_map(|record| match &record.data {
                RData::A(ip) => Some(IpAddr::V4(*ip)),
                _ => None,
            })
            .ok_or_else(|| {
                DomainError::Transport(format!("Bootstrap server has no A record for {}", host))
            })?;

        let port = url.port_or_known_default().unwrap_or(443);
        let address = SocketAddr::new(ip, port);
        let mut resolved = url.clone();
        resolved
            .set_ip_host(ip)
            .map_err(|_| DomainError::Transport(format!("Cannot rewrite host of {}", url)))?;

        let entry = Arc::new(PinnedEndpoint {
            address,
            resolved_uri: resolved.to_string(),
            client: build_http_client(self.options, Some((host, address)))?,
        });
        info!(host = %host, address = %entry.address, uri = %entry.resolved_uri, "Pinned DoH host via bootstrap");

        let client = entry.client.clone();
        bootstrap.pinned.insert(host.to_string(), entry);
        Ok(client)
    }

    async fn post(
        &self,
        client: &reqwest::Client,
        url: &Url,
        request: &[u8],
    ) -> Result<Message, DomainError> {
        let response = client
            .post(url.clone())
            .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
            .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .timeout(self.options.request_timeout)
            .body(request.to_vec())
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("DoH request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let response_bytes = response.bytes().await.map_err(|e| {
            DomainError::Transport(format!("Failed to read DoH response from {}: {}", url, e))
        })?;

        debug!(url = %url, response_len = response_bytes.len(), "DoH response received");
        Message::decode(&response_bytes)
    }

    async fn attempt(
        &self,
        url: &Url,
        request: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Message, DomainError> {
        let client = self.client_for(url, cancel).await?;
        self.post(&client, url, request).await
    }
}

fn build_http_client(
    options: TransportOptions,
    pinned: Option<(&str, SocketAddr)>,
) -> Result<reqwest::Client, DomainError> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(options.request_timeout)
        .pool_max_idle_per_host(4);
    if let Some((host, address)) = pinned {
        builder = builder.resolve(host, address);
    }
    builder
        .build()
        .map_err(|e| DomainError::Transport(format!("Failed to build HTTP client: {}", e)))
}

#[async_trait]
impl DnsClient for HttpsDnsClient {
    async fn resolve(
        &self,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Message, DomainError> {
        let request = Message::query(DOH_QUERY_ID, question.clone());
        let request_bytes = request.encode()?;

        let attempts = self.options.attempts.max(1);
        for attempt in 1..=attempts {
            let endpoint = self.urls.next_endpoint();
            let url = Url::parse(&endpoint).map_err(|e| {
                DomainError::InvalidConfiguration(format!("Invalid DoH URL '{}': {}", endpoint, e))
            })?;

            let outcome = tokio::select! {
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                outcome = self.attempt(&url, &request_bytes, cancel) => outcome,
            };

            match outcome {
                Ok(response) => {
                    debug!(url = %url, question = %question, attempt, "DoH answer received");
                    return Ok(response);
                }
                Err(DomainError::Cancelled) => return Err(DomainError::Cancelled),
                Err(e) if !e.is_retryable() => {
                    warn!(url = %url, question = %question, error = %e, "DoH query failed, not retrying");
                    return Err(e);
                }
                Err(e) => {
                    warn!(url = %url, question = %question, attempt, error = %e, "DoH attempt failed");
                }
            }
        }

        Err(DomainError::ClientExhausted {
            attempts,
            question: question.to_string(),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "HTTPS"
    }
}
