#![allow(dead_code)]

use async_trait::async_trait;
use sieve_dns_application::ports::{DnsResolver, Resolution};
use sieve_dns_domain::{
    DomainError, Message, Question, RData, RecordType, ResourceRecord, ResponseCode,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Resolver returning canned outcomes keyed by domain.
#[derive(Clone, Default)]
pub struct MockDnsResolver {
    responses: Arc<Mutex<HashMap<String, Resolution>>>,
    errors: Arc<Mutex<HashMap<String, DomainError>>>,
    calls: Arc<Mutex<Vec<(IpAddr, Question)>>>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, domain: &str, resolution: Resolution) {
        self.responses
            .lock()
            .unwrap()
            .insert(domain.to_string(), resolution);
    }

    pub fn set_error(&self, domain: &str, error: DomainError) {
        self.errors
            .lock()
            .unwrap()
            .insert(domain.to_string(), error);
    }

    pub fn calls(&self) -> Vec<(IpAddr, Question)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(
        &self,
        client: IpAddr,
        question: &Question,
        _cancel: &CancellationToken,
    ) -> Result<Resolution, DomainError> {
        self.calls.lock().unwrap().push((client, question.clone()));
        let domain = question.name.to_string();

        if let Some(error) = self.errors.lock().unwrap().get(&domain) {
            return Err(error.clone());
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&domain)
            .cloned()
            .unwrap_or_default())
    }
}

/// Upstream-style answer to `question` with one A record.
pub fn answer_for(question: &Question, ip: [u8; 4], ttl: u32) -> Message {
    let request = Message::query(0, question.clone());
    let mut message = Message::response_to(&request, ResponseCode::NoError);
    message.answers.push(ResourceRecord::new(
        question.name.clone(),
        RecordType::A,
        ttl,
        RData::A(ip.into()),
    ));
    message.sync_counts();
    message
}
