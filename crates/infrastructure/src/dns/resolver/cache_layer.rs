use super::super::cache::DnsCache;
use super::super::metrics::DnsMetrics;
use super::synthesized_response;
use async_trait::async_trait;
use sieve_dns_application::ports::{DnsResolver, Resolution};
use sieve_dns_domain::{DomainError, Question, ResponseCode};
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct CachedResolver {
    inner: Arc<dyn DnsResolver>,
    cache: Arc<DnsCache>,
    metrics: Option<Arc<DnsMetrics>>,
}

impl CachedResolver {
    pub fn new(inner: Arc<dyn DnsResolver>, cache: Arc<DnsCache>) -> Self {
        Self {
            inner,
            cache,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<DnsMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl DnsResolver for CachedResolver {
    async fn resolve(
        &self,
        client: IpAddr,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Resolution, DomainError> {
        if let Some(message) = self.cache.get(question) {
            debug!(question = %question, "Cache HIT");
            if let Some(metrics) = &self.metrics {
                metrics.record_cache_hit();
            }
            return Ok(Resolution::cached(message));
        }

        debug!(question = %question, "Cache MISS");
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_miss();
        }

        let resolution = self.inner.resolve(client, question, cancel).await?;
        let Some(message) = resolution.message else {
            return Ok(Resolution {
                message: Some(Arc::new(synthesized_response(
                    question,
                    ResponseCode::ServFail,
                ))),
                blocked: resolution.blocked,
                cached: false,
            });
        };

        if !resolution.blocked {
            self.cache.insert(question, message.clone());
        }

        Ok(Resolution {
            message: Some(message),
            blocked: resolution.blocked,
            cached: false,
        })
    }
}
