#![allow(dead_code)]

use async_trait::async_trait;
use sieve_dns_application::ports::{
    CacheMaintenancePort, ListReloadOutcome, ListReloadPort, MetricsPort, MetricsSnapshot,
};
use sieve_dns_domain::DomainError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub struct MockCacheMaintenancePort {
    purge_calls: AtomicUsize,
    removed_per_purge: usize,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self::removing(0)
    }

    pub fn removing(removed_per_purge: usize) -> Self {
        Self {
            purge_calls: AtomicUsize::new(0),
            removed_per_purge,
        }
    }

    pub fn purge_call_count(&self) -> usize {
        self.purge_calls.load(Ordering::SeqCst)
    }
}

impl CacheMaintenancePort for MockCacheMaintenancePort {
    fn purge_expired(&self) -> usize {
        self.purge_calls.fetch_add(1, Ordering::SeqCst);
        self.removed_per_purge
    }

    fn cache_size(&self) -> usize {
        42
    }
}

pub struct MockListReloadPort {
    reload_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockListReloadPort {
    pub fn new() -> Self {
        Self {
            reload_calls: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn reload_call_count(&self) -> usize {
        self.reload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListReloadPort for MockListReloadPort {
    async fn reload(&self) -> Result<ListReloadOutcome, DomainError> {
        self.reload_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::InvalidConfiguration(
                "mock reload failure".to_string(),
            ));
        }
        Ok(ListReloadOutcome {
            blocked_domains: 3,
            allowed_domains: 1,
            failed_sources: 0,
        })
    }
}

pub struct MockMetricsPort {
    snapshot_calls: AtomicUsize,
}

impl MockMetricsPort {
    pub fn new() -> Self {
        Self {
            snapshot_calls: AtomicUsize::new(0),
        }
    }

    pub fn snapshot_call_count(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }
}

impl MetricsPort for MockMetricsPort {
    fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        MetricsSnapshot {
            requests_total: 10,
            requests_blocked: 2,
            cache_hits: 3,
            cache_misses: 5,
            blocklist_size: 100,
            allowlist_size: 4,
        }
    }
}
