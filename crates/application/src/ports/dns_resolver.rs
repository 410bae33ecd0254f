use async_trait::async_trait;
use sieve_dns_domain::{DomainError, Message, Question};
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outcome of one pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub message: Option<Arc<Message>>,
    pub blocked: bool,
    pub cached: bool,
}

impl Resolution {
    pub fn forwarded(message: Message) -> Self {
        Self {
            message: Some(Arc::new(message)),
            blocked: false,
            cached: false,
        }
    }

    pub fn blocked(message: Message) -> Self {
        Self {
            message: Some(Arc::new(message)),
            blocked: true,
            cached: false,
        }
    }

    pub fn cached(message: Arc<Message>) -> Self {
        Self {
            message: Some(message),
            blocked: false,
            cached: true,
        }
    }
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(
        &self,
        client: IpAddr,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Resolution, DomainError>;
}
