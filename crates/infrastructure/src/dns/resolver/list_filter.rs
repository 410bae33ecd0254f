use super::super::metrics::DnsMetrics;
use super::synthesized_response;
use async_trait::async_trait;
use sieve_dns_application::ports::{AllowlistPort, BlocklistPort, DnsResolver, Resolution};
use sieve_dns_domain::{DomainError, Question, ResponseCode};
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Answers blocked names with NXDOMAIN. An allow entry for the client, or a
/// global one, always lets the query through.
pub struct ListFilterResolver {
    inner: Arc<dyn DnsResolver>,
    blocklist: Arc<dyn BlocklistPort>,
    allowlist: Arc<dyn AllowlistPort>,
    metrics: Option<Arc<DnsMetrics>>,
}

impl ListFilterResolver {
    pub fn new(
        inner: Arc<dyn DnsResolver>,
        blocklist: Arc<dyn BlocklistPort>,
        allowlist: Arc<dyn AllowlistPort>,
    ) -> Self {
        Self {
            inner,
            blocklist,
            allowlist,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<DnsMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl DnsResolver for ListFilterResolver {
    async fn resolve(
        &self,
        client: IpAddr,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Resolution, DomainError> {
        let domain = question.name.to_string();

        if self.allowlist.is_allowed(client, &domain) {
            return self.inner.resolve(client, question, cancel).await;
        }

        if let Some(hit) = self.blocklist.lookup(client, &domain) {
            debug!(
                client = %client,
                domain = %domain,
                scope = %hit.scope,
                "Domain blocked"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_blocked();
            }
            return Ok(Resolution::blocked(synthesized_response(
                question,
                ResponseCode::NxDomain,
            )));
        }

        self.inner.resolve(client, question, cancel).await
    }
}
