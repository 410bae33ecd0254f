use sieve_dns_application::ports::{MetricsPort, MetricsSnapshot};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Process-wide counters. Cheap to bump from any task.
#[derive(Debug, Default)]
pub struct DnsMetrics {
    requests_total: AtomicU64,
    requests_blocked: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    blocklist_size: AtomicI64,
    allowlist_size: AtomicI64,
}

impl DnsMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blocked(&self) {
        self.requests_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn adjust_blocklist_size(&self, delta: i64) {
        self.blocklist_size.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn adjust_allowlist_size(&self, delta: i64) {
        self.allowlist_size.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_blocked: self.requests_blocked.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            blocklist_size: self.blocklist_size.load(Ordering::Relaxed),
            allowlist_size: self.allowlist_size.load(Ordering::Relaxed),
        }
    }
}

impl MetricsPort for DnsMetrics {
    fn snapshot(&self) -> MetricsSnapshot {
        DnsMetrics::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = DnsMetrics::new();
        metrics.record_request();
        metrics.record_request();
        metrics.record_blocked();
        metrics.record_cache_hit();
        metrics.record_cache_miss();
        metrics.record_cache_miss();
        metrics.adjust_blocklist_size(10);
        metrics.adjust_blocklist_size(-3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_total, 2);
        assert_eq!(snapshot.requests_blocked, 1);
        assert_eq!(snapshot.blocklist_size, 7);
        assert_eq!(snapshot.allowlist_size, 0);
        assert!((snapshot.cache_hit_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hit_rate_without_lookups_is_zero() {
        assert_eq!(MetricsSnapshot::default().cache_hit_rate(), 0.0);
    }
}
