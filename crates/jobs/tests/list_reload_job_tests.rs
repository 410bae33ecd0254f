use sieve_dns_jobs::ListReloadJob;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::MockListReloadPort;

#[tokio::test(start_paused = true)]
async fn test_list_reload_job_skips_first_tick() {
    let mock = Arc::new(MockListReloadPort::new());
    let job = Arc::new(ListReloadJob::new(mock.clone()).with_interval(60));

    job.start().await;
    sleep(Duration::from_secs(30)).await;

    assert_eq!(mock.reload_call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_list_reload_job_reloads_each_interval() {
    let mock = Arc::new(MockListReloadPort::new());
    let job = Arc::new(ListReloadJob::new(mock.clone()).with_interval(60));

    job.start().await;
    sleep(Duration::from_secs(125)).await;

    assert_eq!(mock.reload_call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_list_reload_job_failure_is_non_fatal() {
    let mock = Arc::new(MockListReloadPort::new());
    mock.set_should_fail(true);
    let job = Arc::new(ListReloadJob::new(mock.clone()).with_interval(1));

    job.start().await;
    sleep(Duration::from_millis(2500)).await;

    assert_eq!(
        mock.reload_call_count(),
        2,
        "Job should keep running after a failed reload"
    );
}

#[tokio::test(start_paused = true)]
async fn test_list_reload_job_stops_on_cancellation() {
    let mock = Arc::new(MockListReloadPort::new());
    let token = CancellationToken::new();
    let job = Arc::new(
        ListReloadJob::new(mock.clone())
            .with_interval(1)
            .with_cancellation(token.clone()),
    );

    job.start().await;
    token.cancel();
    sleep(Duration::from_secs(5)).await;

    assert_eq!(mock.reload_call_count(), 0);
}
