use super::table::ScopedTable;
use crate::dns::metrics::DnsMetrics;
use sieve_dns_application::ports::{BlockMatch, BlocklistPort};
use sieve_dns_domain::{normalize_domain, ListScope};
use std::net::IpAddr;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// In-memory blocklist. The global scope is consulted before the client's own.
#[derive(Default)]
pub struct BlocklistService {
    table: RwLock<ScopedTable<Option<IpAddr>>>,
    metrics: Option<Arc<DnsMetrics>>,
}

impl BlocklistService {
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
                metrics.adjust_blocklist_size(delta);
            }
        }
    }
}

impl BlocklistPort for BlocklistService {
    fn lookup(&self, client: IpAddr, domain: &str) -> Option<BlockMatch> {
        let key = normalize_domain(domain);
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        [ListScope::Global, ListScope::from_ip(client)]
            .into_iter()
            .find_map(|scope| {
                table.get(scope, &key).map(|override_ip| BlockMatch {
                    scope,
                    override_ip: *override_ip,
                })
            })
    }

    fn add(&self, scope: ListScope, domain: &str, override_ip: Option<IpAddr>) {
        let inserted = self
            .table
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(scope, domain, override_ip);
        if inserted {
            self.report(1);
        }
    }

    fn add_all(&self, scope: ListScope, entries: Vec<(String, Option<IpAddr>)>) {
        let inserted = {
            let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
            entries
                .into_iter()
                .filter(|(domain, override_ip)| table.insert(scope, domain, *override_ip))
                .count()
        };
        debug!(scope = %scope, inserted, "Blocklist entries added");
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
