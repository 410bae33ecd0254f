use async_trait::async_trait;
use sieve_dns_application::ports::{DnsClient, DnsResolver, Resolution};
use sieve_dns_domain::{DomainError, Question};
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Last stage: hands the question to the upstream client.
pub struct UpstreamResolver {
    client: Arc<dyn DnsClient>,
}

impl UpstreamResolver {
    pub fn new(client: Arc<dyn DnsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DnsResolver for UpstreamResolver {
    async fn resolve(
        &self,
        _client: IpAddr,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Resolution, DomainError> {
        let message = self.client.resolve(question, cancel).await?;
        Ok(Resolution::forwarded(message))
    }
}
