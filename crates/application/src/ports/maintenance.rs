use async_trait::async_trait;
use sieve_dns_domain::DomainError;

/// Periodic upkeep of the answer cache.
pub trait CacheMaintenancePort: Send + Sync {
    /// Removes expired entries and returns how many were dropped.
    fn purge_expired(&self) -> usize;

    fn cache_size(&self) -> usize;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListReloadOutcome {
    pub blocked_domains: usize,
    pub allowed_domains: usize,
    pub failed_sources: usize,
}

#[async_trait]
pub trait ListReloadPort: Send + Sync {
    async fn reload(&self) -> Result<ListReloadOutcome, DomainError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_blocked: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub blocklist_size: i64,
    pub allowlist_size: i64,
}

impl MetricsSnapshot {
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

pub trait MetricsPort: Send + Sync {
    fn snapshot(&self) -> MetricsSnapshot;
}
