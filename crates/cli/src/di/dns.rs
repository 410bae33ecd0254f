use sieve_dns_application::ports::{AllowlistPort, BlocklistPort};
use sieve_dns_application::use_cases::HandleDnsQueryUseCase;
use sieve_dns_domain::Config;
use sieve_dns_infrastructure::dns::{
    create_client, AllowlistService, BlocklistService, DnsCache, DnsMetrics, ListLoader,
    ResolverBuilder, TracingQueryLogger,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct DnsServices {
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
    pub cache: Option<Arc<DnsCache>>,
    pub lists: Arc<ListLoader>,
    pub metrics: Arc<DnsMetrics>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let metrics = Arc::new(DnsMetrics::new());
        let blocklist: Arc<dyn BlocklistPort> =
            Arc::new(BlocklistService::new().with_metrics(metrics.clone()));
        let allowlist: Arc<dyn AllowlistPort> =
            Arc::new(AllowlistService::new().with_metrics(metrics.clone()));

        let lists = Arc::new(
            ListLoader::new(blocklist.clone(), allowlist.clone())
                .with_blocklists(config.blocklists.clone())
                .with_allowlists(config.allowlists.clone()),
        );
        let loaded = lists.load().await?;
        if loaded.failed_sources > 0 {
            warn!(
                failed_sources = loaded.failed_sources,
                "Some domain lists could not be read"
            );
        }

        let cache = Self::build_cache(config);
        let client = create_client(&config.upstream)?;

        let mut builder = ResolverBuilder::new(client)
            .with_query_logger(Arc::new(TracingQueryLogger::new()))
            .with_metrics(metrics.clone());
        if let Some(cache) = &cache {
            builder = builder.with_cache(cache.clone());
        }
        if !config.blocklists.is_empty() || !config.allowlists.is_empty() {
            builder = builder.with_lists(blocklist, allowlist);
        }

        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(builder.build()));

        info!("DNS services initialized successfully");

        Ok(Self {
            handler_use_case,
            cache,
            lists,
            metrics,
        })
    }

    fn build_cache(config: &Config) -> Option<Arc<DnsCache>> {
        if !config.cache.enabled {
            info!("Cache disabled");
            return None;
        }
        info!(
            max_entries = config.cache.max_entries,
            negative_ttl_secs = config.cache.negative_ttl_secs,
            "Cache enabled"
        );
        Some(Arc::new(DnsCache::new(
            config.cache.max_entries,
            config.cache.negative_ttl_secs,
        )))
    }
}
