use sieve_dns_application::ports::MetricsPort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct MetricsReportJob {
    metrics: Arc<dyn MetricsPort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl MetricsReportJob {
    pub fn new(metrics: Arc<dyn MetricsPort>) -> Self {
        Self {
            metrics,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting metrics report job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("MetricsReportJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let snapshot = self.metrics.snapshot();
                        info!(
                            target: "metrics",
                            requests_total = snapshot.requests_total,
                            requests_blocked = snapshot.requests_blocked,
                            cache_hits = snapshot.cache_hits,
                            cache_misses = snapshot.cache_misses,
                            cache_hit_rate = format!("{:.3}", snapshot.cache_hit_rate()),
                            blocklist_size = snapshot.blocklist_size,
                            allowlist_size = snapshot.allowlist_size,
                            "DNS metrics"
                        );
                    }
                }
            }
        });
    }
}
