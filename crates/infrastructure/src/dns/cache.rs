//! Response cache keyed by question.
//!
//! Entries live for the smallest answer TTL, or for the negative TTL when
//! the response carries no answers. Expiry uses `tokio::time::Instant` so a
//! paused test clock drives it.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use sieve_dns_application::ports::CacheMaintenancePort;
use sieve_dns_domain::{normalize_domain, Message, Question, RecordClass, RecordType};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const DEFAULT_NEGATIVE_TTL_SECS: u32 = 300;
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Names compare case-insensitively, so the key holds the lowercased form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: String,
    pub record_type: RecordType,
    pub record_class: RecordClass,
}

impl From<&Question> for CacheKey {
    fn from(question: &Question) -> Self {
        Self {
            domain: normalize_domain(&question.name.to_string()),
            record_type: question.qtype,
            record_class: question.qclass,
        }
    }
}

struct CacheEntry {
    message: Arc<Message>,
    expires_at: Instant,
}

pub struct DnsCache {
    entries: DashMap<CacheKey, CacheEntry, FxBuildHasher>,
    negative_ttl: Duration,
    max_entries: usize,
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_NEGATIVE_TTL_SECS)
    }
}

impl DnsCache {
    pub fn new(max_entries: usize, negative_ttl_secs: u32) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            negative_ttl: Duration::from_secs(u64::from(negative_ttl_secs)),
            max_entries,
        }
    }

    pub fn get(&self, question: &Question) -> Option<Arc<Message>> {
        let key = CacheKey::from(question);
        let now = Instant::now();
        {
            let entry = self.entries.get(&key)?;
            if entry.expires_at > now {
                return Some(entry.message.clone());
            }
        }
        self.entries.remove_if(&key, |_, entry| entry.expires_at <= now);
        None
    }

    /// Stores `message` for its computed lifetime. Zero-TTL answers are not kept.
    pub fn insert(&self, question: &Question, message: Arc<Message>) {
        let ttl = self.ttl_for(&message);
        if ttl.is_zero() {
            return;
        }

        let key = CacheKey::from(question);
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.purge_expired();
            if self.entries.len() >= self.max_entries {
                debug!(max_entries = self.max_entries, question = %question, "Cache full, not storing");
                return;
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                message,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn ttl_for(&self, message: &Message) -> Duration {
        match message.min_answer_ttl() {
            Some(ttl) => Duration::from_secs(u64::from(ttl)),
            None => self.negative_ttl,
        }
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl CacheMaintenancePort for DnsCache {
    fn purge_expired(&self) -> usize {
        DnsCache::purge_expired(self)
    }

    fn cache_size(&self) -> usize {
        self.len()
    }
}
