use super::dns_server_mock::answer_for;
use async_trait::async_trait;
use sieve_dns_application::ports::{DnsClient, QueryLogger};
use sieve_dns_domain::{DomainError, Message, Question, QueryLog};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Upstream stand-in answering every question with one A record.
#[derive(Clone)]
pub struct MockDnsClient {
    answer: Ipv4Addr,
    ttl: u32,
    calls: Arc<AtomicUsize>,
    error: Arc<Mutex<Option<DomainError>>>,
}

impl MockDnsClient {
    pub fn new(answer: Ipv4Addr, ttl: u32) -> Self {
        Self {
            answer,
            ttl,
            calls: Arc::new(AtomicUsize::new(0)),
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn fail_with(&self, error: DomainError) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsClient for MockDnsClient {
    async fn resolve(
        &self,
        question: &Question,
        _cancel: &CancellationToken,
    ) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.error.lock().unwrap().clone() {
            return Err(error);
        }
        let request = Message::query(7, question.clone());
        Ok(answer_for(&request, self.answer, self.ttl))
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}

#[derive(Clone, Default)]
pub struct CollectingQueryLogger {
    entries: Arc<Mutex<Vec<QueryLog>>>,
}

impl CollectingQueryLogger {
    pub fn entries(&self) -> Vec<QueryLog> {
        self.entries.lock().unwrap().clone()
    }

    /// Logging runs on a detached task; poll until `count` entries arrive.
    pub async fn wait_for(&self, count: usize) -> Vec<QueryLog> {
        for _ in 0..100 {
            if self.entries.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        self.entries()
    }
}

#[async_trait]
impl QueryLogger for CollectingQueryLogger {
    async fn log_query(
        &self,
        entry: QueryLog,
        _cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

pub struct FailingQueryLogger;

#[async_trait]
impl QueryLogger for FailingQueryLogger {
    async fn log_query(
        &self,
        _entry: QueryLog,
        _cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        Err(DomainError::IoError("log sink unavailable".into()))
    }
}
