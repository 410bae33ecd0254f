use sieve_dns_application::ports::ListReloadPort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Periodically re-reads the block and allow list sources.
///
/// The first tick is consumed up front: lists are already loaded once at
/// startup, so the first reload happens one full interval later.
pub struct ListReloadJob {
    lists: Arc<dyn ListReloadPort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl ListReloadJob {
    pub fn new(lists: Arc<dyn ListReloadPort>) -> Self {
        Self {
            lists,
            interval_secs: 86400,
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
        info!(interval_secs = self.interval_secs, "Starting list reload job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("ListReloadJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        info!("ListReloadJob: reloading domain lists");
                        match self.lists.reload().await {
                            Ok(outcome) if outcome.failed_sources > 0 => warn!(
                                blocked = outcome.blocked_domains,
                                allowed = outcome.allowed_domains,
                                failed_sources = outcome.failed_sources,
                                "ListReloadJob: reload completed with unreadable sources"
                            ),
                            Ok(outcome) => info!(
                                blocked = outcome.blocked_domains,
                                allowed = outcome.allowed_domains,
                                "ListReloadJob: reload completed successfully"
                            ),
                            Err(e) => error!(error = %e, "ListReloadJob: reload failed"),
                        }
                    }
                }
            }
        });
    }
}
