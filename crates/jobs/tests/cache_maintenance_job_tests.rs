use sieve_dns_jobs::CacheMaintenanceJob;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::MockCacheMaintenancePort;

#[tokio::test(start_paused = true)]
async fn test_cache_maintenance_job_does_not_purge_at_startup() {
    let mock = Arc::new(MockCacheMaintenancePort::new());
    let job = Arc::new(CacheMaintenanceJob::new(mock.clone()).with_interval(10));

    job.start().await;
    sleep(Duration::from_secs(5)).await;

    assert_eq!(mock.purge_call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cache_maintenance_job_purges_on_interval() {
    let mock = Arc::new(MockCacheMaintenancePort::removing(7));
    let job = Arc::new(CacheMaintenanceJob::new(mock.clone()).with_interval(1));

    job.start().await;
    sleep(Duration::from_millis(3500)).await;

    assert_eq!(mock.purge_call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cache_maintenance_job_stops_on_cancellation() {
    let mock = Arc::new(MockCacheMaintenancePort::new());
    let token = CancellationToken::new();
    let job = Arc::new(
        CacheMaintenanceJob::new(mock.clone())
            .with_interval(1)
            .with_cancellation(token.clone()),
    );

    job.start().await;
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(mock.purge_call_count(), 1);

    token.cancel();
    sleep(Duration::from_secs(10)).await;
    assert_eq!(mock.purge_call_count(), 1);
}
