use super::super::cache::DnsCache;
use super::super::metrics::DnsMetrics;
use super::cache_layer::CachedResolver;
use super::list_filter::ListFilterResolver;
use super::query_logging::QueryLoggingResolver;
use super::upstream::UpstreamResolver;
use sieve_dns_application::ports::{
    AllowlistPort, BlocklistPort, DnsClient, DnsResolver, QueryLogger,
};
use std::sync::Arc;
use tracing::info;

/// Assembles the pipeline in its fixed order. Optional stages are skipped,
/// never reordered.
pub struct ResolverBuilder {
    client: Arc<dyn DnsClient>,
    cache: Option<Arc<DnsCache>>,
    lists: Option<(Arc<dyn BlocklistPort>, Arc<dyn AllowlistPort>)>,
    logger: Option<Arc<dyn QueryLogger>>,
    metrics: Option<Arc<DnsMetrics>>,
}

impl ResolverBuilder {
    pub fn new(client: Arc<dyn DnsClient>) -> Self {
        Self {
            client,
            cache: None,
            lists: None,
            logger: None,
            metrics: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<DnsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_lists(
        mut self,
        blocklist: Arc<dyn BlocklistPort>,
        allowlist: Arc<dyn AllowlistPort>,
    ) -> Self {
        self.lists = Some((blocklist, allowlist));
        self
    }

    pub fn with_query_logger(mut self, logger: Arc<dyn QueryLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<DnsMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Arc<dyn DnsResolver> {
        info!(
            upstream = self.client.protocol_name(),
            cache = self.cache.is_some(),
            lists = self.lists.is_some(),
            query_log = self.logger.is_some(),
            "Building DNS resolver"
        );

        let mut resolver: Arc<dyn DnsResolver> = Arc::new(UpstreamResolver::new(self.client));

        if let Some(cache) = self.cache {
            let mut cached = CachedResolver::new(resolver, cache);
            if let Some(metrics) = &self.metrics {
                cached = cached.with_metrics(metrics.clone());
            }
            resolver = Arc::new(cached);
        }

        if let Some((blocklist, allowlist)) = self.lists {
            let mut filtered = ListFilterResolver::new(resolver, blocklist, allowlist);
            if let Some(metrics) = &self.metrics {
                filtered = filtered.with_metrics(metrics.clone());
            }
            resolver = Arc::new(filtered);
        }

        if let Some(logger) = self.logger {
            resolver = Arc::new(QueryLoggingResolver::new(resolver, logger));
        }

        resolver
    }
}
