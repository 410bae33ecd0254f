use async_trait::async_trait;
use sieve_dns_application::ports::{DnsResolver, QueryLogger, Resolution};
use sieve_dns_domain::{DomainError, QueryLog, QueryStatus, Question, ResponseCode};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Outermost stage. Reports every query to the logger on a detached task.
pub struct QueryLoggingResolver {
    inner: Arc<dyn DnsResolver>,
    logger: Arc<dyn QueryLogger>,
}

impl QueryLoggingResolver {
    pub fn new(inner: Arc<dyn DnsResolver>, logger: Arc<dyn QueryLogger>) -> Self {
        Self { inner, logger }
    }
}

#[async_trait]
impl DnsResolver for QueryLoggingResolver {
    async fn resolve(
        &self,
        client: IpAddr,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Resolution, DomainError> {
        let start = Instant::now();
        let result = self.inner.resolve(client, question, cancel).await;
        let duration_secs = start.elapsed().as_secs_f32();

        let (response_code, status) = match &result {
            Ok(resolution) => (
                resolution
                    .message
                    .as_ref()
                    .map_or(ResponseCode::ServFail, |m| m.response_code()),
                QueryStatus::from_flags(resolution.blocked, resolution.cached),
            ),
            Err(_) => (ResponseCode::ServFail, QueryStatus::Forwarded),
        };

        let entry = QueryLog {
            timestamp: chrono::Utc::now().timestamp(),
            client_ip: client,
            record_type: question.qtype,
            domain: question.name.to_string(),
            response_code,
            duration_secs,
            status,
        };

        let logger = self.logger.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = logger.log_query(entry, &cancel).await {
                warn!(error = %e, "Failed to log query (non-critical)");
            }
        });

        result
    }
}
