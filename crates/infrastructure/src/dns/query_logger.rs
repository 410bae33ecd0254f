use async_trait::async_trait;
use sieve_dns_application::ports::QueryLogger;
use sieve_dns_domain::{DomainError, QueryLog};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Writes one structured event per answered query under the `query_log` target.
///
/// Filter it like any other target, e.g. `RUST_LOG=info,query_log=off`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingQueryLogger;

impl TracingQueryLogger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QueryLogger for TracingQueryLogger {
    async fn log_query(
        &self,
        entry: QueryLog,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        info!(
            target: "query_log",
            timestamp = entry.timestamp,
            client = %entry.client_ip,
            record_type = %entry.record_type,
            domain = %entry.domain,
            response_code = %entry.response_code,
            duration_ms = f64::from(entry.duration_secs) * 1000.0,
            status = %entry.status,
            "query"
        );
        Ok(())
    }
}
