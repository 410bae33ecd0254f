use async_trait::async_trait;
use sieve_dns_domain::{DomainError, Message, Question};
use tokio_util::sync::CancellationToken;

/// An upstream transport that can answer one question.
///
/// Implementations retry transient failures internally and give up with
/// [`DomainError::ClientExhausted`] once their attempt budget is spent.
#[async_trait]
pub trait DnsClient: Send + Sync {
    async fn resolve(
        &self,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Message, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
