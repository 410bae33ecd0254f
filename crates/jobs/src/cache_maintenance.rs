use sieve_dns_application::ports::CacheMaintenancePort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const DEFAULT_PURGE_INTERVAL_SECS: u64 = 60;

/// Drops expired cache entries on a fixed interval.
pub struct CacheMaintenanceJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    purge_interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheMaintenanceJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>) -> Self {
        Self {
            maintenance,
            purge_interval_secs: DEFAULT_PURGE_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, purge_interval_secs: u64) -> Self {
        self.purge_interval_secs = purge_interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.purge_interval_secs,
            "Starting cache maintenance job"
        );

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.purge_interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheMaintenanceJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.maintenance.purge_expired();
                        if removed > 0 {
                            info!(
                                entries_removed = removed,
                                cache_size = self.maintenance.cache_size(),
                                "Cache purge completed"
                            );
                        } else {
                            debug!("Cache purge found nothing to remove");
                        }
                    }
                }
            }
        });
    }
}
