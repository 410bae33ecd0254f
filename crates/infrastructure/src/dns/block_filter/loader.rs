use super::hosts_file::{parse_hosts, HostsEntry};
use async_trait::async_trait;
use sieve_dns_application::ports::{
    AllowlistPort, BlocklistPort, ListReloadOutcome, ListReloadPort,
};
use sieve_dns_domain::config::DomainListConfig;
use sieve_dns_domain::{DomainError, ListScope};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Default)]
struct ScopeEntries {
    entries: Vec<HostsEntry>,
    complete: bool,
}

/// Fills the block and allow lists from the configured hosts files.
///
/// A scope whose sources all read cleanly is replaced wholesale. When any
/// source of a scope fails, its entries are merged into the existing table
/// so a transient read error never empties a list.
pub struct ListLoader {
    blocklist: Arc<dyn BlocklistPort>,
    allowlist: Arc<dyn AllowlistPort>,
    blocklists: Vec<DomainListConfig>,
    allowlists: Vec<DomainListConfig>,
}

impl ListLoader {
    pub fn new(blocklist: Arc<dyn BlocklistPort>, allowlist: Arc<dyn AllowlistPort>) -> Self {
        Self {
            blocklist,
            allowlist,
            blocklists: Vec::new(),
            allowlists: Vec::new(),
        }
    }

    pub fn with_blocklists(mut self, blocklists: Vec<DomainListConfig>) -> Self {
        self.blocklists = blocklists;
        self
    }

    pub fn with_allowlists(mut self, allowlists: Vec<DomainListConfig>) -> Self {
        self.allowlists = allowlists;
        self
    }

    pub async fn load(&self) -> Result<ListReloadOutcome, DomainError> {
        let mut summary = ListReloadOutcome::default();

        for (scope, scoped) in collect(&self.blocklists, &mut summary).await? {
            if scoped.complete {
                self.blocklist.remove_all(scope);
            }
            let entries = scoped
                .entries
                .into_iter()
                .map(|entry| (entry.domain, entry.override_ip))
                .collect();
            self.blocklist.add_all(scope, entries);
        }

        for (scope, scoped) in collect(&self.allowlists, &mut summary).await? {
            if scoped.complete {
                self.allowlist.remove_all(scope);
            }
            let domains = scoped
                .entries
                .into_iter()
                .map(|entry| entry.domain)
                .collect();
            self.allowlist.add_all(scope, domains);
        }

        summary.blocked_domains = self.blocklist.size();
        summary.allowed_domains = self.allowlist.size();

        info!(
            blocked = summary.blocked_domains,
            allowed = summary.allowed_domains,
            failed_sources = summary.failed_sources,
            "Domain lists loaded"
        );
        Ok(summary)
    }
}

#[async_trait]
impl ListReloadPort for ListLoader {
    async fn reload(&self) -> Result<ListReloadOutcome, DomainError> {
        self.load().await
    }
}

async fn collect(
    configs: &[DomainListConfig],
    summary: &mut ListReloadOutcome,
) -> Result<HashMap<ListScope, ScopeEntries>, DomainError> {
    let mut by_scope: HashMap<ListScope, ScopeEntries> = HashMap::new();

    for config in configs {
        let scope = config
            .scope()
            .map_err(DomainError::InvalidConfiguration)?;
        let scoped = by_scope.entry(scope).or_insert_with(|| ScopeEntries {
            entries: Vec::new(),
            complete: true,
        });

        for source in &config.lists {
            if source.starts_with("http://") || source.starts_with("https://") {
                warn!(source = %source, "Remote lists are not fetched, skipping");
                summary.failed_sources += 1;
                scoped.complete = false;
                continue;
            }

            match tokio::fs::read_to_string(source).await {
                Ok(contents) => {
                    let entries = parse_hosts(&contents);
                    info!(source = %source, scope = %scope, entries = entries.len(), "Read domain list");
                    scoped.entries.extend(entries);
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "Failed to read domain list");
                    summary.failed_sources += 1;
                    scoped.complete = false;
                }
            }
        }
    }

    Ok(by_scope)
}
