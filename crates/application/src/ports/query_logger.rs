use async_trait::async_trait;
use sieve_dns_domain::{DomainError, QueryLog};
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait QueryLogger: Send + Sync {
    async fn log_query(&self, entry: QueryLog, cancel: &CancellationToken)
        -> Result<(), DomainError>;
}
