use super::table::ScopedTable;
use crate::dns::metrics::DnsMetrics;
use sieve_dns_application::ports::AllowlistPort;
use sieve_dns_domain::{normalize_domain, ListScope};
use std::net::IpAddr;
use std::sync::{Arc, RwLock};

/// In-memory allowlist with the same scoping rules as the blocklist.
#[derive(Default)]
pub struct AllowlistService {
    table: RwLock<ScopedTable<()>>,
    metrics: Option<Arc<DnsMetrics>>,
}

impl AllowlistService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: Arc<DnsMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn report(&self, delta: i64) {
        if delta != 0 {
            if let Some(metrics) = &self.metrics {
                metrics.adjust_allowlist_size(delta);
            }
        }
    }
}

impl AllowlistPort for AllowlistService {
    fn is_allowed(&self, client: IpAddr, domain: &str) -> bool {
        let key = normalize_domain(domain);
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        table.get(ListScope::Global, &key).is_some()
            || table.get(ListScope::from_ip(client), &key).is_some()
    }

    fn add(&self, scope: ListScope, domain: &str) {
        let inserted = self
            .table
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(scope, domain, ());
        if inserted {
            self.report(1);
        }
    }

    fn add_all(&self, scope: ListScope, domains: Vec<String>) {
        let inserted = {
            let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
            domains
                .iter()
                .filter(|domain| table.insert(scope, domain, ()))
                .count()
        };
        self.report(inserted as i64);
    }

    fn remove(&self, scope: ListScope, domain: &str) -> bool {
        let removed = self
            .table
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(scope, domain);
        if removed {
            self.report(-1);
        }
        removed
    }

    fn remove_all(&self, scope: ListScope) -> usize {
        let removed = self
            .table
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove_scope(scope);
        self.report(-(removed as i64));
        removed
    }

    fn clear(&self) {
        let removed = self.table.write().unwrap_or_else(|e| e.into_inner()).clear();
        self.report(-(removed as i64));
    }

    fn size(&self) -> usize {
        self.table.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
