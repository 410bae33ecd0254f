use crate::{CacheMaintenanceJob, ListReloadJob, MetricsReportJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(CacheMaintenanceJob);
impl_spawnable_job!(ListReloadJob);
impl_spawnable_job!(MetricsReportJob);

fn spawn_job<J: SpawnableJob>(job: Option<J>, shutdown: &Option<CancellationToken>) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job();
    }
}

/// Starts whichever background jobs were configured.
pub struct JobRunner {
    cache_maintenance: Option<CacheMaintenanceJob>,
    list_reload: Option<ListReloadJob>,
    metrics_report: Option<MetricsReportJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            cache_maintenance: None,
            list_reload: None,
            metrics_report: None,
            shutdown: None,
        }
    }

    pub fn with_cache_maintenance(mut self, job: CacheMaintenanceJob) -> Self {
        self.cache_maintenance = Some(job);
        self
    }

    pub fn with_list_reload(mut self, job: ListReloadJob) -> Self {
        self.list_reload = Some(job);
        self
    }

    pub fn with_metrics_report(mut self, job: MetricsReportJob) -> Self {
        self.metrics_report = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        spawn_job(self.cache_maintenance, &self.shutdown);
        spawn_job(self.list_reload, &self.shutdown);
        spawn_job(self.metrics_report, &self.shutdown);

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
